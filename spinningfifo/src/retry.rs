use std::num::NonZeroU32;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Longest single sleep while waiting, so cancellation is noticed quickly
const CANCEL_POLL: Duration = Duration::from_millis(100);

/// How long to keep trying to open a target that isn't ready.
///
/// The default waits forever, retrying once per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub interval: Duration,
    /// `None` retries without limit
    pub max_attempts: Option<NonZeroU32>,
    /// `None` waits without deadline
    pub timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::unbounded()
    }
}

impl RetryPolicy {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

    pub const fn unbounded() -> Self {
        RetryPolicy {
            interval: Self::DEFAULT_INTERVAL,
            max_attempts: None,
            timeout: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: NonZeroU32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn is_bounded(&self) -> bool {
        self.max_attempts.is_some() || self.timeout.is_some()
    }

    pub(crate) fn start(&self) -> Attempts<'_> {
        Attempts {
            policy: self,
            started: Instant::now(),
            count: 0,
        }
    }
}

/// Bookkeeping for one run of the retry loop
#[derive(Debug)]
pub(crate) struct Attempts<'a> {
    policy: &'a RetryPolicy,
    started: Instant,
    count: u32,
}

impl Attempts<'_> {
    /// Register a new attempt and return its 1-based number
    pub(crate) fn record(&mut self) -> u32 {
        self.count = self.count.saturating_add(1);
        self.count
    }

    pub(crate) fn count(&self) -> u32 {
        self.count
    }

    pub(crate) fn exhausted(&self) -> bool {
        if let Some(max) = self.policy.max_attempts {
            if self.count >= max.get() {
                return true;
            }
        }
        match self.policy.timeout {
            Some(timeout) => self.started.elapsed() >= timeout,
            None => false,
        }
    }

    /// Time to sleep before the next attempt, never past the deadline
    pub(crate) fn next_wait(&self) -> Duration {
        match self.policy.timeout {
            Some(timeout) => self.policy.interval.min(timeout.saturating_sub(self.started.elapsed())),
            None => self.policy.interval,
        }
    }
}

/// Aborts a wait from another thread.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wait {
    Elapsed,
    Cancelled,
}

pub(crate) fn wait(duration: Duration, token: Option<&CancellationToken>) -> Wait {
    let Some(token) = token else {
        std::thread::sleep(duration);
        return Wait::Elapsed;
    };

    // `None` when the deadline can't be represented, only cancellation ends the wait then
    let deadline = Instant::now().checked_add(duration);
    loop {
        if token.is_cancelled() {
            return Wait::Cancelled;
        }
        let slice = match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    return Wait::Elapsed;
                }
                CANCEL_POLL.min(deadline - now)
            },
            None => CANCEL_POLL,
        };
        std::thread::sleep(slice);
    }
}
