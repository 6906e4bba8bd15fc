//! Resolution of stream paths into the OS resource a [`Stream`](super::Stream) acquires.
//!
//! Besides plain filesystem paths, a handful of virtual paths are understood:
//! - `stdio://stdin`, `stdio://stdout`, `stdio://stderr` → a private duplicate of the
//!   process's standard channel
//! - `temp://` → an anonymous temporary file, removed once the stream is closed
//! - `file://path/to/file` → the same as a bare path

use std::ffi::CString;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::{IntoRawFd, RawFd};
use std::path::{Path, PathBuf};

use crate::io::{AccessMode, IoError};

pub const STDIN_PATH: &str = "stdio://stdin";
pub const STDOUT_PATH: &str = "stdio://stdout";
pub const STDERR_PATH: &str = "stdio://stderr";
pub const TEMP_PATH: &str = "temp://";

/// Permission bits for files created by `Write` and `Append` opens, before the umask.
const CREATE_PERMISSIONS: libc::c_uint = 0o666;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamTarget {
    File(PathBuf),
    Standard(RawFd),
    Temp,
}

impl StreamTarget {
    /// Parses a stream path.
    ///
    /// Paths without a `://` separator are filesystem paths. Unknown schemes and unknown
    /// standard channels fail with [`IoError::OpenFailed`].
    pub fn parse(path: &str) -> Result<Self, IoError> {
        let Some(pos) = path.find("://") else {
            return Ok(StreamTarget::File(PathBuf::from(path)));
        };

        let (scheme, location) = path.split_at(pos);
        let location = &location[3..]; // Skip "://"

        match scheme {
            "file" => Ok(StreamTarget::File(PathBuf::from(location))),
            "temp" => Ok(StreamTarget::Temp),
            "stdio" => match location {
                "stdin" => Ok(StreamTarget::Standard(libc::STDIN_FILENO)),
                "stdout" => Ok(StreamTarget::Standard(libc::STDOUT_FILENO)),
                "stderr" => Ok(StreamTarget::Standard(libc::STDERR_FILENO)),
                _ => Err(IoError::open_failed(
                    path,
                    io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("Unknown standard channel: {location}"),
                    ),
                )),
            },
            _ => Err(IoError::open_failed(
                path,
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("Unknown stream scheme: {scheme}"),
                ),
            )),
        }
    }

    /// Acquires a descriptor owned exclusively by the caller.
    pub(crate) fn acquire(&self, path: &str, mode: AccessMode) -> Result<RawFd, IoError> {
        let result = match self {
            StreamTarget::File(file_path) => open_file(file_path, mode),
            StreamTarget::Standard(fd) => duplicate(*fd),
            StreamTarget::Temp => tempfile::tempfile().map(|file| file.into_raw_fd()),
        };
        result.map_err(|e| IoError::open_failed(path, e))
    }
}

fn open_file(path: &Path, mode: AccessMode) -> io::Result<RawFd> {
    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let fd = unsafe { libc::open(c_path.as_ptr(), mode.open_flags(), CREATE_PERMISSIONS) };
    if fd < 0 {
        return Err(io::Error::last_os_error());
    }

    // A read-only open succeeds on directories, but they are not byte streams
    let mut stat: libc::stat = unsafe { std::mem::zeroed() };
    if unsafe { libc::fstat(fd, &mut stat) } < 0 {
        let err = io::Error::last_os_error();
        unsafe { libc::close(fd) };
        return Err(err);
    }
    if stat.st_mode & libc::S_IFMT == libc::S_IFDIR {
        unsafe { libc::close(fd) };
        return Err(io::Error::from_raw_os_error(libc::EISDIR));
    }

    Ok(fd)
}

fn duplicate(fd: RawFd) -> io::Result<RawFd> {
    let dup_fd = unsafe { libc::fcntl(fd, libc::F_DUPFD_CLOEXEC, 0) };
    if dup_fd < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(dup_fd)
}
