use libc::c_int;

/// How a [`Stream`](super::Stream) is opened. Fixed for the lifetime of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessMode {
    /// Open an existing resource for reading only.
    Read,
    /// Create or truncate, read and write.
    Write,
    /// Create if absent, read and write, writes land at the end.
    Append,
}

impl AccessMode {
    /// Flags passed to `open(2)` for a filesystem path.
    pub(crate) fn open_flags(self) -> c_int {
        let flags = match self {
            AccessMode::Read => libc::O_RDONLY,
            AccessMode::Write => libc::O_RDWR | libc::O_CREAT | libc::O_TRUNC,
            AccessMode::Append => libc::O_RDWR | libc::O_CREAT | libc::O_APPEND,
        };
        flags | libc::O_CLOEXEC
    }

    pub fn permits_read(self) -> bool {
        match self {
            AccessMode::Read => true,
            AccessMode::Write => true,
            AccessMode::Append => true,
        }
    }

    pub fn permits_write(self) -> bool {
        match self {
            AccessMode::Read => false,
            AccessMode::Write => true,
            AccessMode::Append => true,
        }
    }
}

/// Reference point for [`Stream::seek`](super::Stream::seek).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeekAnchor {
    Start,
    Current,
    End,
}

impl SeekAnchor {
    pub(crate) fn whence(self) -> c_int {
        match self {
            SeekAnchor::Start => libc::SEEK_SET,
            SeekAnchor::Current => libc::SEEK_CUR,
            SeekAnchor::End => libc::SEEK_END,
        }
    }
}
