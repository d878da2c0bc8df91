use std::io;
use std::path::Path;

/// Create a named pipe at `path` with the given permission bits
#[cfg(unix)]
pub fn mkfifo(path: impl AsRef<Path>, mode: u32) -> io::Result<()> {
    let cpath = crate::str::path_to_cstring(path.as_ref())
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

    if unsafe { libc::mkfifo(cpath.as_ptr(), mode as libc::mode_t) } == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// Whether the file system object at `path` is a named pipe.
/// Symlinks are followed.
#[cfg(unix)]
pub fn is_fifo(path: impl AsRef<Path>) -> io::Result<bool> {
    use std::os::unix::fs::FileTypeExt;

    Ok(std::fs::metadata(path)?.file_type().is_fifo())
}

#[cfg(all(test, unix))]
mod tests {
    use super::{is_fifo, mkfifo};

    #[test]
    fn creates_fifo() {
        let dir = tempdir::TempDir::new("spinningfifo.tests.utils.creates_fifo").unwrap();
        let path = dir.path().join("fifo");

        mkfifo(&path, 0o600).unwrap();
        assert!(is_fifo(&path).unwrap());

        let err = mkfifo(&path, 0o600).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::AlreadyExists);
    }

    #[test]
    fn regular_file_is_not_fifo() {
        let dir = tempdir::TempDir::new("spinningfifo.tests.utils.regular_file").unwrap();
        let path = dir.path().join("file");
        std::fs::write(&path, b"").unwrap();

        assert!(!is_fifo(&path).unwrap());
    }
}
