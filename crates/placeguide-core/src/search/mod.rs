//! Resource-discovery providers: turn a free-text query into result links.

mod duckduckgo;
mod parse;

use std::sync::Arc;
use std::time::Duration;

use crate::retry::ProviderError;

pub use duckduckgo::DuckDuckGoProvider;
pub use parse::extract_result_links;

/// A web search backend. Implementations block the calling thread.
pub trait SearchProvider: Send + Sync {
    /// Returns up to `result_cap` result URLs in ranking order, pausing
    /// `pause` between result pages when more than one page is needed.
    fn search(
        &self,
        query: &str,
        result_cap: usize,
        pause: Duration,
    ) -> Result<Vec<String>, ProviderError>;

    /// Short provider name for logs.
    fn name(&self) -> &'static str;
}

impl<P: SearchProvider + ?Sized> SearchProvider for Arc<P> {
    fn search(
        &self,
        query: &str,
        result_cap: usize,
        pause: Duration,
    ) -> Result<Vec<String>, ProviderError> {
        (**self).search(query, result_cap, pause)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
