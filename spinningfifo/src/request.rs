use std::borrow::Cow;
use std::path::PathBuf;
use std::str::FromStr;

use crate::Error;

/// A single message destined for a single target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    pub target_path: PathBuf,
    pub payload: Vec<u8>,
}

impl WriteRequest {
    pub const SEPARATOR: char = ' ';

    pub fn new(target_path: impl Into<PathBuf>, payload: impl Into<Vec<u8>>) -> Self {
        WriteRequest {
            target_path: target_path.into(),
            payload: payload.into(),
        }
    }

    /// Parse `<path> <message>`.
    ///
    /// Only the first space separates; the rest of the string is the message,
    /// kept verbatim (it may be empty or contain more spaces).
    pub fn parse(arg: &str) -> crate::Result<Self> {
        let Some((path, message)) = arg.split_once(Self::SEPARATOR) else {
            return Err(Error::MalformedArgument(arg.to_string()));
        };
        if path.is_empty() {
            return Err(Error::MalformedArgument(arg.to_string()));
        }

        Ok(WriteRequest::new(path, message.as_bytes()))
    }

    pub fn message_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }
}

impl TryFrom<&str> for WriteRequest {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        WriteRequest::parse(value)
    }
}

impl FromStr for WriteRequest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WriteRequest::parse(s)
    }
}

impl std::fmt::Display for WriteRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}{}{}", self.target_path.display(), Self::SEPARATOR, self.message_lossy()))
    }
}
