use std::time::Duration;

use crate::config::RetryConfig;

/// High-level classification of a provider error for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Provider asked us to slow down (HTTP 429).
    RateLimited,
    /// Any other error (never retried).
    Other,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
    /// Retryable error, but the attempt budget is used up.
    Exhausted,
}

/// Per-invocation retry bookkeeping. Created fresh for every lookup and
/// dropped when it returns, so nothing carries over between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptState {
    /// Rate-limited attempts so far.
    pub attempts_used: u32,
    /// Delay before the next retry.
    pub backoff: Duration,
}

impl AttemptState {
    pub fn new(policy: &RetryPolicy) -> Self {
        Self {
            attempts_used: 0,
            backoff: policy.initial_backoff,
        }
    }

    /// Record one rate-limited attempt.
    pub fn record_rate_limited(&mut self) {
        self.attempts_used += 1;
    }

    /// Double the delay after a completed backoff sleep.
    pub fn advance_backoff(&mut self) {
        self.backoff = self.backoff.saturating_mul(2);
    }
}

/// Exponential backoff policy: only rate limits are retried, the delay starts
/// at `initial_backoff` and doubles after every retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of rate-limited attempts before giving up.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_secs(1),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(cfg: &RetryConfig) -> Self {
        Self {
            max_attempts: cfg.max_attempts,
            initial_backoff: cfg.initial_backoff(),
        }
    }
}

impl RetryPolicy {
    /// Decide what to do after a failed attempt.
    ///
    /// `state` must already include the failed attempt when `kind` is
    /// `RateLimited` (see `AttemptState::record_rate_limited`).
    pub fn decide(&self, state: &AttemptState, kind: ErrorKind) -> RetryDecision {
        match kind {
            ErrorKind::Other => RetryDecision::NoRetry,
            ErrorKind::RateLimited if state.attempts_used >= self.max_attempts => {
                RetryDecision::Exhausted
            }
            ErrorKind::RateLimited => RetryDecision::RetryAfter(state.backoff),
        }
    }

    /// Backoff delays the policy would produce for a provider that is always
    /// rate limited: `initial_backoff * 2^k` for each retry.
    pub fn schedule(&self) -> Vec<Duration> {
        let mut state = AttemptState::new(self);
        let mut delays = Vec::new();
        loop {
            state.record_rate_limited();
            match self.decide(&state, ErrorKind::RateLimited) {
                RetryDecision::RetryAfter(d) => {
                    delays.push(d);
                    state.advance_backoff();
                }
                _ => return delays,
            }
        }
    }
}
