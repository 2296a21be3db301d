use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable consulted for the generative API key when the config has none.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Retry policy parameters for resource lookups (`[retry]` in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of rate-limited attempts before giving up.
    pub max_attempts: u32,
    /// Delay in seconds before the first retry; doubles after each retry.
    pub initial_backoff_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff_secs: 1.0,
        }
    }
}

impl RetryConfig {
    pub fn initial_backoff(&self) -> Duration {
        secs_or(self.initial_backoff_secs, Duration::from_secs(1))
    }
}

/// Resource-discovery provider settings (`[search]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// HTML search endpoint.
    pub endpoint: String,
    /// Number of links requested per lookup.
    pub result_cap: usize,
    /// Pause in seconds between result pages.
    pub pause_secs: f64,
    pub user_agent: String,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://html.duckduckgo.com/html/".to_string(),
            result_cap: 5,
            pause_secs: 2.0,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            timeout_secs: 15,
        }
    }
}

impl SearchConfig {
    pub fn pause(&self) -> Duration {
        secs_or(self.pause_secs, Duration::from_secs(2))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Generative-text provider settings (`[generative]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerativeConfig {
    /// API base, without the `/models/...` suffix.
    pub endpoint: String,
    pub model: String,
    /// API key; when absent, `GOOGLE_API_KEY` is read from the environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-pro".to_string(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

impl GenerativeConfig {
    /// Config value first, then the environment. Blank keys count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Configuration loaded once at startup from `~/.config/placeguide/config.toml`
/// and handed to the components that need it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuideConfig {
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub generative: GenerativeConfig,
}

/// Negative, NaN and infinite values fall back to `default`.
fn secs_or(secs: f64, default: Duration) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(default)
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("placeguide")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<GuideConfig> {
    load_or_init_at(&config_path()?)
}

/// Like `load_or_init` for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<GuideConfig> {
    if !path.exists() {
        let default_cfg = GuideConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: GuideConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
