use std::io;

/// Errors produced by [`Stream`](super::Stream) operations.
///
/// Precondition kinds (`NotReadable`, `InvalidLength`, `NotWritable`, `NotSeekable`, `NotOpen`)
/// are raised before any system call is attempted. The `*Failed` kinds wrap the OS error
/// reported by the underlying call.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("Failed to open '{path}': {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("The stream must be readable")]
    NotReadable,

    #[error("The length must be greater than or equal to 1, got {0}")]
    InvalidLength(usize),

    #[error("Failed to read from the stream: {0}")]
    ReadFailed(#[source] io::Error),

    #[error("The stream must be writable")]
    NotWritable,

    #[error("Failed to write to the stream: {0}")]
    WriteFailed(#[source] io::Error),

    #[error("The stream must be seekable")]
    NotSeekable,

    #[error("Failed to seek the stream: {0}")]
    SeekFailed(#[source] io::Error),

    #[error("The stream must be open")]
    NotOpen,

    #[error("Failed to get the position of the stream: {0}")]
    TellFailed(#[source] io::Error),

    #[error("Failed to rewind the stream: {0}")]
    RewindFailed(#[source] io::Error),

    #[error("Failed to stat the stream: {0}")]
    StatFailed(#[source] io::Error),

    #[error("Failed to close the stream: {0}")]
    CloseFailed(#[source] io::Error),
}

impl IoError {
    pub(crate) fn open_failed(path: &str, source: io::Error) -> Self {
        IoError::OpenFailed { path: path.to_string(), source }
    }
}
