//! Classify provider errors into retry policy error kinds.

use super::error::ProviderError;
use super::policy::ErrorKind;

/// Marker providers embed in error text when they are throttled.
const RATE_LIMIT_MARKER: &str = "429";

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 => ErrorKind::RateLimited,
        _ => ErrorKind::Other,
    }
}

/// Classify a provider error. Structured HTTP errors go by status alone;
/// anything else is rate limited when its message carries the 429 marker
/// (e.g. curl's "The requested URL returned error: 429").
pub fn classify(e: &ProviderError) -> ErrorKind {
    match e {
        ProviderError::Http { status, .. } => classify_http_status(*status),
        other if other.to_string().contains(RATE_LIMIT_MARKER) => ErrorKind::RateLimited,
        _ => ErrorKind::Other,
    }
}
