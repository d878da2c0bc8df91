use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

/// Opens a target for writing. The file system is reached only through here.
pub trait Opener {
    type Handle: io::Write;

    fn open(&self, path: &Path) -> io::Result<Self::Handle>;
}

/// Opens the real file system object write-only without blocking.
///
/// The target is never created or truncated.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl Opener for SystemOpener {
    type Handle = File;

    fn open(&self, path: &Path) -> io::Result<File> {
        let mut options = OpenOptions::new();
        options.write(true);
        #[cfg(unix)] {
            use std::os::unix::fs::OpenOptionsExt;

            options.custom_flags(libc::O_NONBLOCK);
        }
        options.open(path)
    }
}

/// Whether an open error means the target isn't there yet or has no reader,
/// i.e. the open should be retried later.
pub fn is_not_ready(err: &io::Error) -> bool {
    #[cfg(unix)] {
        if let Some(code) = err.raw_os_error() {
            return matches!(code, libc::ENOENT | libc::ENODEV | libc::ENXIO);
        }
    }
    err.kind() == io::ErrorKind::NotFound
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::is_not_ready;

    #[cfg(unix)]
    #[test]
    fn classifies_os_errors() {
        assert!(is_not_ready(&io::Error::from_raw_os_error(libc::ENOENT)));
        assert!(is_not_ready(&io::Error::from_raw_os_error(libc::ENODEV)));
        assert!(is_not_ready(&io::Error::from_raw_os_error(libc::ENXIO)));

        assert!(!is_not_ready(&io::Error::from_raw_os_error(libc::EACCES)));
        assert!(!is_not_ready(&io::Error::from_raw_os_error(libc::ENOTDIR)));
        assert!(!is_not_ready(&io::Error::from_raw_os_error(libc::EISDIR)));
    }

    #[test]
    fn classifies_synthetic_errors() {
        assert!(is_not_ready(&io::Error::from(io::ErrorKind::NotFound)));
        assert!(!is_not_ready(&io::Error::from(io::ErrorKind::PermissionDenied)));
    }

    #[cfg(unix)]
    mod system {
        use std::io::{Read, Write};

        use super::super::{is_not_ready, Opener, SystemOpener};

        #[test]
        fn missing_target_is_not_ready() {
            let dir = tempdir::TempDir::new("spinningfifo.tests.open.missing").unwrap();
            let err = SystemOpener.open(&dir.path().join("fifo")).unwrap_err();
            assert!(is_not_ready(&err), "{err}");
        }

        #[test]
        fn fifo_without_reader_is_not_ready() {
            let dir = tempdir::TempDir::new("spinningfifo.tests.open.no_reader").unwrap();
            let path = dir.path().join("fifo");
            utils::fs::mkfifo(&path, 0o600).unwrap();

            let err = SystemOpener.open(&path).unwrap_err();
            assert_eq!(err.raw_os_error(), Some(libc::ENXIO));
            assert!(is_not_ready(&err));
        }

        #[test]
        fn fifo_with_reader_opens() {
            use std::os::unix::fs::OpenOptionsExt;

            let dir = tempdir::TempDir::new("spinningfifo.tests.open.reader").unwrap();
            let path = dir.path().join("fifo");
            utils::fs::mkfifo(&path, 0o600).unwrap();

            let mut reader = std::fs::OpenOptions::new()
                .read(true)
                .custom_flags(libc::O_NONBLOCK)
                .open(&path)
                .unwrap();

            let mut handle = SystemOpener.open(&path).unwrap();
            handle.write_all(b"ping").unwrap();
            drop(handle);

            let mut buf = String::new();
            reader.read_to_string(&mut buf).unwrap();
            assert_eq!(buf, "ping");
        }

        #[test]
        fn directory_is_terminal() {
            let dir = tempdir::TempDir::new("spinningfifo.tests.open.directory").unwrap();
            let err = SystemOpener.open(dir.path()).unwrap_err();
            assert!(!is_not_ready(&err), "{err}");
        }

        #[test]
        fn regular_file_is_not_truncated() {
            let dir = tempdir::TempDir::new("spinningfifo.tests.open.regular").unwrap();
            let path = dir.path().join("file");
            std::fs::write(&path, b"abcdef").unwrap();

            let mut handle = SystemOpener.open(&path).unwrap();
            handle.write_all(b"XY").unwrap();
            drop(handle);

            assert_eq!(std::fs::read(&path).unwrap(), b"XYcdef");
        }
    }
}
