//! Output channels bound to the process's standard-error and standard-output channels.
//!
//! Each owns a private duplicate of the descriptor, so closing the channel never closes
//! the process's own stderr or stdout.

use rawio_common::io::{AccessMode, IoError, Stream, STDERR_PATH, STDOUT_PATH};

use crate::{OutputChannel, OutputWrite};

#[derive(Debug)]
pub struct StandardErrorChannel {
    channel: OutputChannel,
}

impl StandardErrorChannel {
    pub fn new() -> Result<Self, IoError> {
        let channel = OutputChannel::new(|| Stream::open(STDERR_PATH, AccessMode::Write))?;
        Ok(Self { channel })
    }

    pub fn stream(&self) -> &Stream {
        self.channel.stream()
    }

    pub fn close(self) -> Result<(), IoError> {
        self.channel.close()
    }
}

impl OutputWrite for StandardErrorChannel {
    fn write(&mut self, data: &[u8]) -> Result<(), IoError> {
        self.channel.write(data)
    }
}

#[derive(Debug)]
pub struct StandardOutputChannel {
    channel: OutputChannel,
}

impl StandardOutputChannel {
    pub fn new() -> Result<Self, IoError> {
        let channel = OutputChannel::new(|| Stream::open(STDOUT_PATH, AccessMode::Write))?;
        Ok(Self { channel })
    }

    pub fn stream(&self) -> &Stream {
        self.channel.stream()
    }

    pub fn close(self) -> Result<(), IoError> {
        self.channel.close()
    }
}

impl OutputWrite for StandardOutputChannel {
    fn write(&mut self, data: &[u8]) -> Result<(), IoError> {
        self.channel.write(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_fd_open(fd: i32) -> bool {
        unsafe { libc::fcntl(fd, libc::F_GETFD) >= 0 }
    }

    #[test]
    fn test_standard_error_channel() {
        let mut channel = StandardErrorChannel::new().unwrap();
        assert_eq!(channel.stream().path(), STDERR_PATH);
        assert_eq!(channel.stream().mode(), AccessMode::Write);
        assert!(channel.stream().is_writable());

        channel.write(b"").unwrap();
        channel.close().unwrap();

        assert!(is_fd_open(libc::STDERR_FILENO));
    }

    #[test]
    fn test_standard_output_channel() {
        let mut channel = StandardOutputChannel::new().unwrap();
        assert_eq!(channel.stream().path(), STDOUT_PATH);
        assert!(channel.stream().is_writable());

        channel.write(b"").unwrap();
        drop(channel);

        assert!(is_fd_open(libc::STDOUT_FILENO));
    }

    #[test]
    fn test_independent_channels() {
        let first = StandardOutputChannel::new().unwrap();
        let mut second = StandardOutputChannel::new().unwrap();

        first.close().unwrap();
        second.write(b"").unwrap();
        assert!(second.stream().is_open());
    }
}
