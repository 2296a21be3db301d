//! Provider error type for retry classification.

use thiserror::Error;

/// Error returned by a single provider call (search or generation).
/// Kept structured so the retry loop can classify it before it is reported.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Curl reported an error (timeout, connection, TLS, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Response had a non-2xx status. `body` is a short excerpt for diagnostics.
    #[error("HTTP {status}: {body}")]
    Http { status: u32, body: String },
    /// Response arrived but could not be decoded.
    #[error("malformed response: {0}")]
    Decode(String),
    /// Provider-specific failure reported in an otherwise valid response.
    #[error("{0}")]
    Message(String),
}

impl ProviderError {
    /// Build an `Http` error, keeping at most 200 characters of the body.
    pub fn http(status: u32, body: &str) -> Self {
        let excerpt: String = body.trim().chars().take(200).collect();
        ProviderError::Http {
            status,
            body: excerpt,
        }
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u32> {
        match self {
            ProviderError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
