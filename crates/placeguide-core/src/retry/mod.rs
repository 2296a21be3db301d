//! Retry and backoff policy.
//!
//! Error classification (rate limit or not), exponential backoff decisions,
//! and the blocking retry loop shared by provider-facing code.

mod classify;
mod error;
mod policy;
mod run;
mod sleep;

pub use classify::{classify, classify_http_status};
pub use error::ProviderError;
pub use policy::{AttemptState, ErrorKind, RetryDecision, RetryPolicy};
pub use run::{run_with_retry, RetryError};
pub use sleep::{Sleeper, ThreadSleeper};
