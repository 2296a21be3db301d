//! Retry loop: run a provider call until success or the policy says stop.

use thiserror::Error;

use super::classify;
use super::error::ProviderError;
use super::policy::{AttemptState, ErrorKind, RetryDecision, RetryPolicy};
use super::sleep::Sleeper;
use crate::notify::Observer;

/// Why `run_with_retry` gave up.
#[derive(Debug, Error)]
pub enum RetryError {
    /// The call failed with an error that is never retried.
    #[error("{0}")]
    NonRetryable(ProviderError),
    /// Every allowed attempt was rate limited. `last` is `None` only when the
    /// policy allowed zero attempts.
    #[error("max retries exceeded after {attempts} attempts")]
    Exhausted {
        attempts: u32,
        last: Option<ProviderError>,
    },
    /// The caller aborted during a call or a backoff sleep.
    #[error("cancelled after {attempts} attempts")]
    Cancelled { attempts: u32 },
}

/// Runs `f` until it succeeds or the retry policy says to stop.
///
/// Only rate-limited failures are retried. Before each retry a warning goes
/// to `observer` and the thread sleeps through `sleeper`; the delay doubles
/// after each retry. No sleep follows the final attempt. The sleeper's abort
/// state is checked before and after every call.
pub fn run_with_retry<T, F>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    observer: &dyn Observer,
    mut f: F,
) -> Result<T, RetryError>
where
    F: FnMut() -> Result<T, ProviderError>,
{
    let mut state = AttemptState::new(policy);
    let mut last = None;
    while state.attempts_used < policy.max_attempts {
        if sleeper.is_aborted() {
            return Err(RetryError::Cancelled {
                attempts: state.attempts_used,
            });
        }
        let outcome = f();
        // A call that finished after the abort request is discarded, even on success.
        if sleeper.is_aborted() {
            return Err(RetryError::Cancelled {
                attempts: state.attempts_used,
            });
        }
        let err = match outcome {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };
        let kind = classify::classify(&err);
        if kind == ErrorKind::RateLimited {
            state.record_rate_limited();
        }
        match policy.decide(&state, kind) {
            RetryDecision::NoRetry => return Err(RetryError::NonRetryable(err)),
            RetryDecision::Exhausted => {
                last = Some(err);
                break;
            }
            RetryDecision::RetryAfter(delay) => {
                tracing::debug!(
                    attempt = state.attempts_used,
                    delay_ms = delay.as_millis() as u64,
                    "rate limited: {}",
                    err
                );
                observer.warn(&format!(
                    "Rate limited. Retrying in {} seconds...",
                    delay.as_secs_f64()
                ));
                if sleeper.sleep(delay).is_err() {
                    return Err(RetryError::Cancelled {
                        attempts: state.attempts_used,
                    });
                }
                state.advance_backoff();
                last = Some(err);
            }
        }
    }
    Err(RetryError::Exhausted {
        attempts: state.attempts_used,
        last,
    })
}
