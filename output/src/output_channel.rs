//! An output sink owning one Write-capable stream.
//!
//! The destination is chosen by an acquisition strategy injected at construction; the
//! channel never opens anything itself.

use rawio_common::io::{IoError, Stream};

use crate::OutputWrite;

/// OutputChannel forwards writes to the stream produced by its acquisition strategy.
///
/// The stream is closed when the channel is closed or dropped, whichever comes first.
#[derive(Debug)]
pub struct OutputChannel {
    stream: Stream,
}

impl OutputChannel {
    /// Create a new OutputChannel from an acquisition strategy.
    ///
    /// # Arguments
    /// * `acquire` - Produces the stream the channel will own.
    ///
    /// # Returns
    /// * `Ok(OutputChannel)` - If the strategy produced a writable stream
    /// * `Err` - The strategy's own error, or `IoError::NotWritable` if the stream it
    ///   produced cannot be written to
    pub fn new<F>(acquire: F) -> Result<Self, IoError>
    where
        F: FnOnce() -> Result<Stream, IoError>,
    {
        let stream = acquire()?;
        if !stream.is_writable() {
            return Err(IoError::NotWritable);
        }

        tracing::trace!("Output channel bound to '{}'", stream.path());
        Ok(Self { stream })
    }

    /// The owned stream, for state queries.
    pub fn stream(&self) -> &Stream {
        &self.stream
    }

    /// Close the owned stream, reporting a failure instead of logging it.
    pub fn close(mut self) -> Result<(), IoError> {
        self.stream.close()
    }
}

impl OutputWrite for OutputChannel {
    fn write(&mut self, data: &[u8]) -> Result<(), IoError> {
        self.stream.write(data)?;
        Ok(())
    }
}

impl Drop for OutputChannel {
    fn drop(&mut self) {
        if let Err(e) = self.stream.close() {
            tracing::error!("Failed to close output stream '{}': {}", self.stream.path(), e);
        }
    }
}
