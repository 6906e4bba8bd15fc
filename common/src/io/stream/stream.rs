//! A mode-gated stream over a raw OS descriptor.
//!
//! Every operation is a single blocking system call on the descriptor (or a loop of them,
//! for a length-less `read`). Capability and state preconditions are checked before the
//! call so misuse surfaces as a precondition error rather than an OS failure.

use std::io;
use std::os::unix::io::RawFd;

use crate::config::StreamConfig;
use crate::io::{AccessMode, IoError, SeekAnchor, StreamTarget};

/// A byte stream owning exactly one OS descriptor.
///
/// The descriptor is released by [`Stream::close`] or, failing that, when the stream is
/// dropped. It is never released twice.
#[derive(Debug)]
pub struct Stream {
    /// The descriptor owned by this stream.
    fd: RawFd,

    /// The mode the stream was opened with.
    mode: AccessMode,

    /// Whether `fd` is still valid.
    is_open: bool,

    /// Set when the most recent read returned no data.
    eof: bool,

    /// Chunk size used by length-less reads.
    chunk_size: usize,

    /// The path the stream was opened from.
    path: String,
}

impl Stream {
    /// Opens `path` under `mode` with the default configuration, adjusted by `RAWIO_*`
    /// environment variables.
    ///
    /// # Arguments
    /// * `path` - A filesystem path or a virtual path (`stdio://stdout`, `temp://`, ...)
    /// * `mode` - The access mode, fixed for the lifetime of the stream
    ///
    /// # Returns
    /// * `Ok(Stream)` - An open stream
    /// * `Err(IoError::OpenFailed)` - If the path cannot be resolved or opened
    pub fn open(path: &str, mode: AccessMode) -> Result<Self, IoError> {
        Self::open_with_config(path, mode, &StreamConfig::from_env())
    }

    /// Opens `path` under `mode` using the given configuration.
    pub fn open_with_config(
        path: &str,
        mode: AccessMode,
        config: &StreamConfig,
    ) -> Result<Self, IoError> {
        let fd = StreamTarget::parse(path)?.acquire(path, mode)?;

        tracing::debug!("Opened stream '{}' in {:?} mode (fd {})", path, mode, fd);

        Ok(Self {
            fd,
            mode,
            is_open: true,
            eof: false,
            chunk_size: config.read_chunk_size.max(1),
            path: path.to_string(),
        })
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_readable(&self) -> bool {
        self.is_open && self.mode.permits_read()
    }

    pub fn is_writable(&self) -> bool {
        self.is_open && self.mode.permits_write()
    }

    /// Returns whether the underlying resource supports repositioning.
    ///
    /// Asks the OS directly with a no-op `lseek`: pipes and sockets fail it with `ESPIPE`
    /// and are not seekable even though they are open.
    pub fn is_seekable(&self) -> bool {
        if !self.is_open {
            return false;
        }

        unsafe { libc::lseek(self.fd, 0, libc::SEEK_CUR) >= 0 }
    }

    /// Reads from the current position.
    ///
    /// With `length == None`, reads in chunks until end of stream and returns everything.
    /// With `Some(n)`, performs a single read of up to `n` bytes; the result may be shorter,
    /// or empty at end of stream. A single read never requests more than the configured
    /// chunk size.
    pub fn read(&mut self, length: Option<usize>) -> Result<Vec<u8>, IoError> {
        if let Some(0) = length {
            return Err(IoError::InvalidLength(0));
        }

        if !self.is_readable() {
            return Err(IoError::NotReadable);
        }

        match length {
            Some(length) => {
                let mut buffer = vec![0u8; length.min(self.chunk_size)];
                let n = self.read_chunk(&mut buffer)?;
                buffer.truncate(n);
                Ok(buffer)
            }
            None => {
                let mut data = Vec::new();
                let mut chunk = vec![0u8; self.chunk_size];
                loop {
                    let n = self.read_chunk(&mut chunk)?;
                    if n == 0 {
                        break;
                    }
                    data.extend_from_slice(&chunk[..n]);
                }
                Ok(data)
            }
        }
    }

    fn read_chunk(&mut self, buffer: &mut [u8]) -> Result<usize, IoError> {
        let n =
            unsafe { libc::read(self.fd, buffer.as_mut_ptr() as *mut libc::c_void, buffer.len()) };
        if n < 0 {
            return Err(IoError::ReadFailed(io::Error::last_os_error()));
        }

        let n = n as usize;
        self.eof = n == 0;
        Ok(n)
    }

    /// Writes `data` at the current position and returns the number of bytes the OS accepted.
    ///
    /// A short write is not an error; the caller sees it through the returned count.
    pub fn write(&mut self, data: &[u8]) -> Result<usize, IoError> {
        if !self.is_writable() {
            return Err(IoError::NotWritable);
        }

        let n = unsafe { libc::write(self.fd, data.as_ptr() as *const libc::c_void, data.len()) };
        if n < 0 {
            return Err(IoError::WriteFailed(io::Error::last_os_error()));
        }

        Ok(n as usize)
    }

    /// Repositions the stream relative to `anchor`.
    ///
    /// # Arguments
    /// * `offset` - Byte offset, may be negative for `Current` and `End`
    /// * `anchor` - The reference point
    ///
    /// # Returns
    /// * `Err(IoError::NotSeekable)` - If the stream is closed or the resource is not seekable
    /// * `Err(IoError::SeekFailed)` - If the resulting position is invalid
    pub fn seek(&mut self, offset: i64, anchor: SeekAnchor) -> Result<(), IoError> {
        if !self.is_seekable() {
            return Err(IoError::NotSeekable);
        }

        let offset = libc::off_t::try_from(offset).map_err(|e| {
            IoError::SeekFailed(io::Error::new(io::ErrorKind::InvalidInput, e))
        })?;

        let result = unsafe { libc::lseek(self.fd, offset, anchor.whence()) };
        if result < 0 {
            return Err(IoError::SeekFailed(io::Error::last_os_error()));
        }

        self.eof = false;
        Ok(())
    }

    /// Returns the current byte offset from the start of the stream.
    pub fn tell(&self) -> Result<u64, IoError> {
        if !self.is_open {
            return Err(IoError::NotOpen);
        }

        let position = unsafe { libc::lseek(self.fd, 0, libc::SEEK_CUR) };
        if position < 0 {
            return Err(IoError::TellFailed(io::Error::last_os_error()));
        }

        Ok(position as u64)
    }

    /// Returns whether the most recent read hit end of stream.
    ///
    /// This is not a live check: before any read it is `false` even on an empty stream.
    pub fn eof(&self) -> Result<bool, IoError> {
        if !self.is_open {
            return Err(IoError::NotOpen);
        }

        Ok(self.eof)
    }

    pub fn rewind(&mut self) -> Result<(), IoError> {
        if !self.is_open {
            return Err(IoError::NotOpen);
        }

        let result = unsafe { libc::lseek(self.fd, 0, libc::SEEK_SET) };
        if result < 0 {
            return Err(IoError::RewindFailed(io::Error::last_os_error()));
        }

        self.eof = false;
        Ok(())
    }

    /// Returns the size in bytes of the underlying resource.
    pub fn size(&self) -> Result<u64, IoError> {
        if !self.is_open {
            return Err(IoError::NotOpen);
        }

        let stat = self.stat().map_err(IoError::StatFailed)?;
        Ok(stat.st_size as u64)
    }

    /// Releases the descriptor. Closing a closed stream is a no-op.
    ///
    /// The descriptor counts as released even when `close(2)` reports an error, so a
    /// failed close is never retried.
    pub fn close(&mut self) -> Result<(), IoError> {
        if !self.is_open {
            return Ok(());
        }

        self.is_open = false;

        if unsafe { libc::close(self.fd) } < 0 {
            return Err(IoError::CloseFailed(io::Error::last_os_error()));
        }

        tracing::trace!("Closed stream '{}'", self.path);
        Ok(())
    }

    fn stat(&self) -> io::Result<libc::stat> {
        let mut stat: libc::stat = unsafe { std::mem::zeroed() };
        if unsafe { libc::fstat(self.fd, &mut stat) } < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(stat)
    }
}

impl Drop for Stream {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!("Failed to close stream '{}' on drop: {}", self.path, e);
        }
    }
}
