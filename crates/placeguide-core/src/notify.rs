//! Observer channel for human-readable status messages during a lookup.

/// Receives warnings (recoverable, e.g. a rate-limit retry) and errors
/// (terminal failures). Nothing is returned to the caller.
pub trait Observer: Send + Sync {
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Observer that forwards messages to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!("{}", message);
    }
}
