use std::io;
use std::path::PathBuf;

use crate::hook::HookError;

pub type Result<T> = std::result::Result<T, crate::Error>;

#[derive(thiserror::Error)]
pub enum Error {
    #[error("invalid spinningfifo syntax `{0}`, must be: <file> <string>")]
    MalformedArgument(String),
    #[error("Couldn't open {}: {source}", .path.display())]
    OpenFailed { path: PathBuf, source: io::Error },
    #[error("Short write to {}: wrote {written} of {expected} bytes", .path.display())]
    ShortWrite { path: PathBuf, written: usize, expected: usize },
    #[error("Couldn't write to {}: {source}", .path.display())]
    WriteFailed { path: PathBuf, source: io::Error },
    #[error("Timed out waiting for {} after {attempts} attempt(s)", .path.display())]
    TimedOut { path: PathBuf, attempts: u32 },
    #[error("Cancelled while waiting for {}", .0.display())]
    Cancelled(PathBuf),
    #[error(transparent)]
    Hook(#[from] HookError),
}

/// The kind of an [`Error`], without its payload.
///
/// A target that doesn't exist yet or has no reader is never reported; it is
/// waited on instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedArgument,
    OpenFailed,
    ShortWrite,
    WriteFailed,
    TimedOut,
    Cancelled,
    Hook,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MalformedArgument(_) => ErrorKind::MalformedArgument,
            Error::OpenFailed { .. } => ErrorKind::OpenFailed,
            Error::ShortWrite { .. } => ErrorKind::ShortWrite,
            Error::WriteFailed { .. } => ErrorKind::WriteFailed,
            Error::TimedOut { .. } => ErrorKind::TimedOut,
            Error::Cancelled(_) => ErrorKind::Cancelled,
            Error::Hook(_) => ErrorKind::Hook,
        }
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Automatically get propper error messages from main function returning a result
        std::fmt::Display::fmt(self, f)
    }
}
