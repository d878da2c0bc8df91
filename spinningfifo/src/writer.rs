use std::io::Write;
use std::path::Path;

use log::{debug, info, trace};

use crate::open::{self, Opener, SystemOpener};
use crate::retry::{self, Wait};
use crate::{CancellationToken, Error, RetryPolicy, WriteRequest};

/// Result of a successful write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    /// Number of open attempts it took, including the successful one
    pub attempts: u32,
    pub written: usize,
}

/// Waits for a target to become writable, then writes a message to it.
///
/// ```no_run
/// use spinningfifo::SpinningFifo;
///
/// SpinningFifo::new().execute("/tmp/testfifo hello world")?;
/// # Ok::<(), spinningfifo::Error>(())
/// ```
#[derive(Debug)]
pub struct SpinningFifo<O: Opener = SystemOpener> {
    opener: O,
    policy: RetryPolicy,
    token: Option<CancellationToken>,
}

impl SpinningFifo<SystemOpener> {
    pub fn new() -> Self {
        SpinningFifo::with_opener(SystemOpener)
    }
}

impl Default for SpinningFifo<SystemOpener> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Opener> SpinningFifo<O> {
    pub fn with_opener(opener: O) -> Self {
        SpinningFifo {
            opener,
            policy: RetryPolicy::default(),
            token: None,
        }
    }

    pub fn policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn opener(&self) -> &O {
        &self.opener
    }

    /// Parse `<path> <message>` and write the message to the path.
    ///
    /// # Errors
    /// Fails without touching the file system when `arg` is malformed.
    pub fn execute(&self, arg: &str) -> crate::Result<()> {
        let request = WriteRequest::parse(arg)?;
        self.write_request(&request).map(|_| ())
    }

    /// Open the target, retrying while it isn't ready, and write the whole
    /// payload with a single write call. The handle is closed before returning.
    pub fn write_request(&self, request: &WriteRequest) -> crate::Result<Delivery> {
        let path = request.target_path.as_path();
        let (mut handle, attempts) = self.open(path)?;

        let written = handle.write(&request.payload)
            .map_err(|source| Error::WriteFailed { path: path.to_path_buf(), source })?;
        if written != request.payload.len() {
            return Err(Error::ShortWrite {
                path: path.to_path_buf(),
                written,
                expected: request.payload.len(),
            });
        }

        drop(handle);
        trace!("Wrote {} bytes to {} and closed it", written, path.display());

        Ok(Delivery { attempts, written })
    }

    fn open(&self, path: &Path) -> crate::Result<(O::Handle, u32)> {
        let mut attempts = self.policy.start();
        loop {
            if self.is_cancelled() {
                return Err(Error::Cancelled(path.to_path_buf()));
            }

            info!("waiting for {} ...", path.display());
            let attempt = attempts.record();
            match self.opener.open(path) {
                Ok(handle) => {
                    debug!("Opened {} after {} attempt(s)", path.display(), attempt);
                    return Ok((handle, attempt));
                },
                Err(err) if open::is_not_ready(&err) => {
                    trace!("{} not ready: {}", path.display(), err);
                    if attempts.exhausted() {
                        return Err(Error::TimedOut { path: path.to_path_buf(), attempts: attempts.count() });
                    }
                    if retry::wait(attempts.next_wait(), self.token.as_ref()) == Wait::Cancelled {
                        return Err(Error::Cancelled(path.to_path_buf()));
                    }
                },
                Err(source) => {
                    return Err(Error::OpenFailed { path: path.to_path_buf(), source });
                }
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.token.as_ref().is_some_and(CancellationToken::is_cancelled)
    }
}
