//! `placeguide resources <type>` – numbered links from the search provider.

use anyhow::{Context, Result};
use placeguide_core::config::GuideConfig;
use placeguide_core::control::AbortToken;
use placeguide_core::fetcher::{FetchFailure, Resource, RetryingFetcher};
use placeguide_core::retry::{RetryPolicy, ThreadSleeper};
use placeguide_core::search::DuckDuckGoProvider;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::observer::ConsoleObserver;

/// Per-invocation overrides for the configured retry policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryOverrides {
    pub max_attempts: Option<u32>,
    pub initial_backoff_secs: Option<f64>,
}

impl RetryOverrides {
    pub fn apply(self, mut policy: RetryPolicy) -> Result<RetryPolicy> {
        if let Some(n) = self.max_attempts {
            anyhow::ensure!(n > 0, "--max-attempts must be at least 1");
            policy.max_attempts = n;
        }
        if let Some(secs) = self.initial_backoff_secs {
            policy.initial_backoff = Duration::try_from_secs_f64(secs)
                .ok()
                .filter(|d| !d.is_zero())
                .with_context(|| format!("invalid --initial-backoff {}", secs))?;
        }
        Ok(policy)
    }
}

/// Markdown list lines for a non-empty lookup.
pub fn render_resources(resource_type: &str, resources: &[Resource]) -> Vec<String> {
    let mut lines = Vec::with_capacity(resources.len() + 1);
    lines.push(format!(
        "Here are some resources related to '{}':",
        resource_type
    ));
    for (idx, r) in resources.iter().enumerate() {
        lines.push(format!("{}. [{}]({})", idx + 1, r.title, r.link));
    }
    lines
}

/// Output lines for a finished lookup. With `json`, successful lookups print
/// as one JSON array, empty or not. Failures are errors either way.
pub fn outcome_lines(
    resource_type: &str,
    outcome: Result<Vec<Resource>, FetchFailure>,
    json: bool,
) -> Result<Vec<String>> {
    let resources = outcome.map_err(|failure| {
        anyhow::anyhow!("resource lookup for '{}' failed: {}", resource_type, failure)
    })?;
    if json {
        let body = serde_json::to_string_pretty(&resources).context("encode resources")?;
        return Ok(vec![body]);
    }
    if resources.is_empty() {
        return Ok(vec![format!("No resources found for '{}'.", resource_type)]);
    }
    Ok(render_resources(resource_type, &resources))
}

pub async fn run_resources(
    cfg: &GuideConfig,
    resource_type: &str,
    overrides: RetryOverrides,
    json: bool,
) -> Result<()> {
    if resource_type.trim().is_empty() {
        eprintln!("warning: Please enter a resource type before fetching resources.");
        return Ok(());
    }

    let policy = overrides.apply(RetryPolicy::from(&cfg.retry))?;

    // First Ctrl-C cancels the lookup (request, page pause or backoff); a second one exits.
    let token = AbortToken::new();
    let ctrl_c = tokio::spawn({
        let token = token.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            token.request_abort();
            if tokio::signal::ctrl_c().await.is_ok() {
                std::process::exit(130);
            }
        }
    });

    let provider = DuckDuckGoProvider::from_config(&cfg.search).with_abort(token.clone());
    let fetcher = RetryingFetcher::from_config(provider, cfg)
        .with_policy(policy)
        .with_sleeper(Arc::new(ThreadSleeper::with_abort(token)))
        .with_observer(Arc::new(ConsoleObserver));

    let query = resource_type.to_string();
    let outcome = tokio::task::spawn_blocking(move || fetcher.fetch(&query))
        .await
        .context("resource lookup task join");
    ctrl_c.abort();

    for line in outcome_lines(resource_type, outcome?, json)? {
        println!("{}", line);
    }
    Ok(())
}
