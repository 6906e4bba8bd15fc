use rawio_common::io::IoError;

/// Core trait for output consumers
pub trait OutputWrite {
    /// Write data to the output, propagating the underlying stream error verbatim
    fn write(&mut self, data: &[u8]) -> Result<(), IoError>;
}
