//! Configuration loading for search-mcp
//!
//! Configuration is loaded from:
//! 1. Environment variables `SEARCH_BACKEND`, `SEARXNG_URL`, `SEARCH_LOCALE`,
//!    `SEARCH_EMPTY_QUERY`
//! 2. Environment variable SEARCH_MCP_CONFIG_PATH
//! 3. ~/.binks/search.toml
//! 4. Default values

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::backends::BackendKind;
use crate::locale::Locale;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General search configuration
    #[serde(default)]
    pub search: SearchConfig,
    /// DuckDuckGo specific configuration
    #[serde(default)]
    pub duckduckgo: DuckDuckGoConfig,
    /// SearXNG specific configuration
    #[serde(default)]
    pub searxng: SearXNGConfig,
}

/// What the dispatcher does with a missing or empty `query`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyQueryPolicy {
    /// Fail the call before any backend request
    #[default]
    Reject,
    /// Send the empty query and report whatever the backend answers
    Forward,
}

impl FromStr for EmptyQueryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reject" => Ok(EmptyQueryPolicy::Reject),
            "forward" => Ok(EmptyQueryPolicy::Forward),
            other => Err(format!(
                "unknown empty query policy '{}' (expected reject or forward)",
                other
            )),
        }
    }
}

/// General search configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Backend serving every tool
    #[serde(default)]
    pub backend: BackendKind,
    /// Language of summaries and failure messages
    #[serde(default)]
    pub locale: Locale,
    /// Handling of missing or empty queries
    #[serde(default)]
    pub empty_query: EmptyQueryPolicy,
}

/// DuckDuckGo configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuckDuckGoConfig {
    /// Base URL of the html endpoint used for text search
    #[serde(default = "default_ddg_html_url")]
    pub html_url: String,
    /// Base URL of the JSON endpoints used for news and image search
    #[serde(default = "default_ddg_api_url")]
    pub api_url: String,
    /// Region code (`kl` / `l` parameter)
    #[serde(default = "default_ddg_region")]
    pub region: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// SearXNG configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearXNGConfig {
    /// SearXNG instance URL
    #[serde(default = "default_searxng_url")]
    pub url: String,
    /// Language hint sent as the `language` parameter
    #[serde(default = "default_searxng_language")]
    pub language: String,
    /// Engines to use (comma-separated, empty = use instance defaults)
    #[serde(default)]
    pub engines: String,
    /// Connect/read timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

// Default value functions
fn default_ddg_html_url() -> String {
    "https://html.duckduckgo.com".to_string()
}

fn default_ddg_api_url() -> String {
    "https://duckduckgo.com".to_string()
}

fn default_ddg_region() -> String {
    "wt-wt".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("search-mcp/{}", env!("CARGO_PKG_VERSION"))
}

fn default_searxng_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_searxng_language() -> String {
    "zh-CN".to_string()
}

impl Default for DuckDuckGoConfig {
    fn default() -> Self {
        Self {
            html_url: default_ddg_html_url(),
            api_url: default_ddg_api_url(),
            region: default_ddg_region(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for SearXNGConfig {
    fn default() -> Self {
        Self {
            url: default_searxng_url(),
            language: default_searxng_language(),
            engines: String::new(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults, then apply environment
    /// overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(_) => {
                tracing::info!("Config file not found, using defaults");
                Self::default()
            }
            None => {
                tracing::info!("No config path specified, using defaults");
                Self::default()
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::info!("Loading config from: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| anyhow!("invalid config {}: {}", path.display(), e))
    }

    /// Apply overrides from an environment lookup (highest priority)
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup("SEARCH_BACKEND") {
            self.search.backend = backend.parse().map_err(|e: String| anyhow!(e))?;
        }
        if let Some(url) = lookup("SEARXNG_URL") {
            self.searxng.url = url;
        }
        if let Some(locale) = lookup("SEARCH_LOCALE") {
            self.search.locale = locale.parse().map_err(|e: String| anyhow!(e))?;
        }
        if let Some(policy) = lookup("SEARCH_EMPTY_QUERY") {
            self.search.empty_query = policy.parse().map_err(|e: String| anyhow!(e))?;
        }
        Ok(())
    }

    /// Find the configuration file path
    fn find_config_path() -> Option<PathBuf> {
        // 1. Check environment variable
        if let Ok(path) = std::env::var("SEARCH_MCP_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        // 2. Check ~/.binks/search.toml
        if let Ok(home) = std::env::var("HOME") {
            let path = PathBuf::from(home).join(".binks").join("search.toml");
            return Some(path);
        }

        None
    }
}
