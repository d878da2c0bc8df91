use std::ffi::{CString, NulError};
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum PathConversionError {
    #[error("Path contains an interior nul byte: {0}")]
    NulError(#[from] NulError),
    /// The path is not valid UTF-8.
    /// Only returned on non-unix platforms
    #[error("Path is not valid UTF-8")]
    EncodingError,
}

/// Convert a path into a nul-terminated string that can be handed to libc
pub fn path_to_cstring(path: &Path) -> Result<CString, PathConversionError> {
    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStrExt;

        Ok(CString::new(path.as_os_str().as_bytes())?)
    }

    #[cfg(not(unix))]
    {
        let Some(str) = path.to_str() else {
            return Err(PathConversionError::EncodingError);
        };
        Ok(CString::new(str)?)
    }
}
