//! DuckDuckGo search provider over the HTML results endpoint.
//!
//! No API key required. Throttling surfaces as `ProviderError::Http { status: 429 }`.

use std::time::Duration;

use super::parse::extract_result_links;
use super::SearchProvider;
use crate::config::SearchConfig;
use crate::control::AbortToken;
use crate::http::{self, RequestOptions};
use crate::retry::{ProviderError, Sleeper, ThreadSleeper};

/// Upper bound on result pages fetched for one query.
const MAX_PAGES: usize = 3;

/// DuckDuckGo HTML search provider.
#[derive(Debug, Clone)]
pub struct DuckDuckGoProvider {
    endpoint: String,
    request: RequestOptions,
}

impl DuckDuckGoProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            request: RequestOptions::default(),
        }
    }

    pub fn from_config(cfg: &SearchConfig) -> Self {
        Self {
            endpoint: cfg.endpoint.clone(),
            request: RequestOptions {
                user_agent: Some(cfg.user_agent.clone()),
                timeout: cfg.timeout(),
                ..RequestOptions::default()
            },
        }
    }

    /// Stop in-flight requests and the page pause once `token` is raised.
    pub fn with_abort(mut self, token: AbortToken) -> Self {
        self.request.abort = Some(token);
        self
    }

    fn pause_between_pages(&self, pause: Duration) -> Result<(), ProviderError> {
        let sleeper = match &self.request.abort {
            Some(token) => ThreadSleeper::with_abort(token.clone()),
            None => ThreadSleeper::new(),
        };
        sleeper
            .sleep(pause)
            .map_err(|_| ProviderError::Message("search cancelled".to_string()))
    }

    fn page_url(&self, query: &str, offset: usize) -> Result<String, ProviderError> {
        let mut url = url::Url::parse(&self.endpoint).map_err(|e| {
            ProviderError::Message(format!("invalid search endpoint {}: {}", self.endpoint, e))
        })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query);
            if offset > 0 {
                pairs.append_pair("s", &offset.to_string());
            }
        }
        Ok(url.into())
    }
}

impl SearchProvider for DuckDuckGoProvider {
    fn search(
        &self,
        query: &str,
        result_cap: usize,
        pause: Duration,
    ) -> Result<Vec<String>, ProviderError> {
        let mut links: Vec<String> = Vec::new();
        if result_cap == 0 {
            return Ok(links);
        }

        let mut offset = 0;
        for page in 0..MAX_PAGES {
            if page > 0 {
                self.pause_between_pages(pause)?;
            }
            let url = self.page_url(query, offset)?;
            tracing::debug!(page, "GET {}", url);
            let response = http::get(&url, &self.request)?.error_for_status()?;

            let page_links = extract_result_links(&response.body);
            offset += page_links.len();
            let before = links.len();
            for link in page_links {
                if !links.contains(&link) {
                    links.push(link);
                }
            }
            if links.len() >= result_cap || links.len() == before {
                break;
            }
        }

        links.truncate(result_cap);
        tracing::debug!(count = links.len(), "duckduckgo results for {:?}", query);
        Ok(links)
    }

    fn name(&self) -> &'static str {
        "duckduckgo"
    }
}
