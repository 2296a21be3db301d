//! Backoff delay primitives.

use std::time::{Duration, Instant};

use crate::control::{AbortToken, Aborted};

/// Longest uninterrupted stretch `ThreadSleeper` sleeps before re-checking its token.
const POLL_SLICE: Duration = Duration::from_millis(50);

/// Blocks the current thread for a backoff delay. Implementations may end
/// the delay early and report `Aborted`.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, delay: Duration) -> Result<(), Aborted>;

    /// True once the caller has asked to stop. Checked around provider calls.
    fn is_aborted(&self) -> bool {
        false
    }
}

/// Sleeps on the calling thread, optionally interruptible by an `AbortToken`.
#[derive(Debug, Clone, Default)]
pub struct ThreadSleeper {
    abort: Option<AbortToken>,
}

impl ThreadSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleeper that returns `Aborted` within one poll slice of `token` being set.
    pub fn with_abort(token: AbortToken) -> Self {
        Self { abort: Some(token) }
    }
}

impl Sleeper for ThreadSleeper {
    fn sleep(&self, delay: Duration) -> Result<(), Aborted> {
        let Some(token) = &self.abort else {
            std::thread::sleep(delay);
            return Ok(());
        };
        // Delays too large for an Instant have no reachable deadline: poll until aborted.
        let deadline = Instant::now().checked_add(delay);
        loop {
            if token.is_aborted() {
                return Err(Aborted);
            }
            let slice = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Ok(());
                    }
                    (deadline - now).min(POLL_SLICE)
                }
                None => POLL_SLICE,
            };
            std::thread::sleep(slice);
        }
    }

    fn is_aborted(&self) -> bool {
        self.abort.as_ref().is_some_and(AbortToken::is_aborted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_sleep_waits() {
        let start = Instant::now();
        ThreadSleeper::new()
            .sleep(Duration::from_millis(20))
            .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn already_aborted_returns_immediately() {
        let token = AbortToken::new();
        token.request_abort();
        let start = Instant::now();
        let r = ThreadSleeper::with_abort(token).sleep(Duration::from_secs(30));
        assert_eq!(r, Err(Aborted));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn huge_delay_does_not_overflow() {
        let token = AbortToken::new();
        token.request_abort();
        let r = ThreadSleeper::with_abort(token).sleep(Duration::from_secs(u64::MAX / 2));
        assert_eq!(r, Err(Aborted));
        let r = ThreadSleeper::with_abort(AbortToken::new());
        assert!(!r.is_aborted());
    }

    #[test]
    fn huge_delay_waits_until_abort() {
        let token = AbortToken::new();
        let sleeper = ThreadSleeper::with_abort(token.clone());
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(100));
            token.request_abort();
        });
        assert_eq!(sleeper.sleep(Duration::MAX), Err(Aborted));
        handle.join().unwrap();
    }

    #[test]
    fn abort_from_other_thread_interrupts() {
        let token = AbortToken::new();
        let sleeper = ThreadSleeper::with_abort(token.clone());
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(100));
            token.request_abort();
        });
        let start = Instant::now();
        let r = sleeper.sleep(Duration::from_secs(30));
        handle.join().unwrap();
        assert_eq!(r, Err(Aborted));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn untouched_token_sleeps_full_delay() {
        let sleeper = ThreadSleeper::with_abort(AbortToken::new());
        let start = Instant::now();
        assert!(sleeper.sleep(Duration::from_millis(120)).is_ok());
        assert!(start.elapsed() >= Duration::from_millis(120));
    }
}
