//! Resource lookup with rate-limit retry.
//!
//! `RetryingFetcher` asks a `SearchProvider` for links, retries with
//! exponential backoff while the provider is rate limiting, and turns the
//! links into numbered `Resource` records. Provider errors never escape:
//! they become a `FetchFailure` plus a message on the observer channel.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::config::GuideConfig;
use crate::notify::{Observer, TracingObserver};
use crate::retry::{run_with_retry, RetryError, RetryPolicy, Sleeper, ThreadSleeper};
use crate::search::SearchProvider;

/// Links requested per lookup.
pub const DEFAULT_RESULT_CAP: usize = 5;
/// Pause between result pages.
pub const DEFAULT_PAGE_PAUSE: Duration = Duration::from_secs(2);

/// One search hit, labelled by its 1-based position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub title: String,
    pub link: String,
}

impl Resource {
    /// `index` is 0-based; the title uses the 1-based position.
    pub fn numbered(index: usize, link: String) -> Self {
        Self {
            title: format!("Resource {}", index + 1),
            link,
        }
    }
}

/// How a lookup failed. A rate-limited attempt is not a failure kind: it is
/// retried, and a lookup that stays rate limited ends as `Exhausted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Provider failed in a way that is never retried.
    NonRetryable,
    /// Retry budget used up while rate limited.
    Exhausted,
    /// Stopped by the caller during a request, page pause or backoff.
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::NonRetryable => "non-retryable",
            FailureKind::Exhausted => "exhausted",
            FailureKind::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Terminal failure of one lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {detail}")]
pub struct FetchFailure {
    pub kind: FailureKind,
    pub detail: String,
}

impl From<RetryError> for FetchFailure {
    fn from(e: RetryError) -> Self {
        match e {
            RetryError::NonRetryable(err) => FetchFailure {
                kind: FailureKind::NonRetryable,
                detail: err.to_string(),
            },
            RetryError::Exhausted { attempts, last } => FetchFailure {
                kind: FailureKind::Exhausted,
                detail: match last {
                    Some(err) => format!("gave up after {} attempts: {}", attempts, err),
                    None => format!("gave up after {} attempts", attempts),
                },
            },
            RetryError::Cancelled { attempts } => FetchFailure {
                kind: FailureKind::Cancelled,
                detail: format!("cancelled after {} attempts", attempts),
            },
        }
    }
}

/// Queries a search provider with rate-limit retry. Holds no per-call state;
/// every `fetch` starts from a fresh attempt count and initial backoff.
pub struct RetryingFetcher<P> {
    provider: P,
    policy: RetryPolicy,
    result_cap: usize,
    page_pause: Duration,
    sleeper: Arc<dyn Sleeper>,
    observer: Arc<dyn Observer>,
}

impl<P: SearchProvider> RetryingFetcher<P> {
    /// Fetcher with default policy (5 attempts, 1s initial backoff), result
    /// cap 5, 2s page pause, a plain thread sleeper and a tracing observer.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            policy: RetryPolicy::default(),
            result_cap: DEFAULT_RESULT_CAP,
            page_pause: DEFAULT_PAGE_PAUSE,
            sleeper: Arc::new(ThreadSleeper::new()),
            observer: Arc::new(TracingObserver),
        }
    }

    /// Apply retry and search settings from config.
    pub fn from_config(provider: P, cfg: &GuideConfig) -> Self {
        Self::new(provider)
            .with_policy(RetryPolicy::from(&cfg.retry))
            .with_result_cap(cfg.search.result_cap)
            .with_page_pause(cfg.search.pause())
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_result_cap(mut self, result_cap: usize) -> Self {
        self.result_cap = result_cap;
        self
    }

    pub fn with_page_pause(mut self, pause: Duration) -> Self {
        self.page_pause = pause;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Look up resources for `query`.
    ///
    /// `Ok` carries the resources in provider order; it is empty only when
    /// the provider found nothing. Callers are expected to reject empty
    /// queries before calling.
    pub fn fetch(&self, query: &str) -> Result<Vec<Resource>, FetchFailure> {
        tracing::info!(
            provider = self.provider.name(),
            max_attempts = self.policy.max_attempts,
            "fetching resources for {:?}",
            query
        );
        let outcome = run_with_retry(
            &self.policy,
            self.sleeper.as_ref(),
            self.observer.as_ref(),
            || {
                self.provider
                    .search(query, self.result_cap, self.page_pause)
            },
        );

        match outcome {
            Ok(links) => {
                tracing::info!(count = links.len(), "resources found");
                Ok(links
                    .into_iter()
                    .enumerate()
                    .map(|(i, link)| Resource::numbered(i, link))
                    .collect())
            }
            Err(e) => {
                let message = match &e {
                    RetryError::NonRetryable(err) => format!("Error fetching resources: {}", err),
                    RetryError::Exhausted { .. } => {
                        "Max retries exceeded. Please try again later.".to_string()
                    }
                    RetryError::Cancelled { .. } => "Resource lookup cancelled.".to_string(),
                };
                self.observer.error(&message);
                Err(FetchFailure::from(e))
            }
        }
    }

    /// Like `fetch`, but any failure yields an empty list. The observer still
    /// receives the failure message.
    pub fn fetch_or_empty(&self, query: &str) -> Vec<Resource> {
        self.fetch(query).unwrap_or_default()
    }
}
