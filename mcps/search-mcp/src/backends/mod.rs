//! Search backend implementations
//!
//! This module provides a trait-based abstraction for search backends.
//! Supports DuckDuckGo (public endpoints, no setup) and SearXNG
//! (self-hosted meta-search engine).
//!
//! Backends only fetch: they hand back provider records untouched and leave
//! the mapping into the output schema to [`crate::normalize`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{SearchError, SearchResult};
use crate::types::{RawResult, SearchCategory, SearchQuery};

pub mod duckduckgo;
pub mod searxng;

/// Identifies a backend and the field mapping tables that go with it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendKind {
    #[default]
    #[serde(rename = "duckduckgo")]
    DuckDuckGo,
    #[serde(rename = "searxng")]
    SearXNG,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::DuckDuckGo => "duckduckgo",
            BackendKind::SearXNG => "searxng",
        }
    }

    /// Upper bound applied to every requested `max_results`
    pub fn max_results_ceiling(&self) -> usize {
        match self {
            BackendKind::DuckDuckGo => 10,
            BackendKind::SearXNG => 30,
        }
    }

    /// Limit used when the caller does not ask for one
    pub fn default_max_results(&self) -> usize {
        match self {
            BackendKind::DuckDuckGo => 5,
            BackendKind::SearXNG => 10,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "duckduckgo" | "ddg" => Ok(BackendKind::DuckDuckGo),
            "searxng" => Ok(BackendKind::SearXNG),
            other => Err(format!(
                "unknown backend '{}' (expected duckduckgo or searxng)",
                other
            )),
        }
    }
}

/// Trait for search backends
///
/// All search backends must implement this trait to provide a consistent
/// interface for the dispatcher.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Which backend this is; selects the normalization tables
    fn kind(&self) -> BackendKind;

    /// Get the name of this backend
    fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Whether this backend has an operation for the category
    fn supports(&self, _category: SearchCategory) -> bool {
        true
    }

    /// Check if this backend is configured and available
    fn is_available(&self) -> bool;

    /// Run one search and return at most `query.max_results` provider records
    async fn search(&self, query: &SearchQuery) -> SearchResult<Vec<RawResult>>;
}

/// Longest error body kept in a status error
const MAX_ERROR_BODY: usize = 200;

/// Read a response body, turning a non-success status into an error
pub(crate) async fn read_body(
    backend: &'static str,
    response: reqwest::Response,
) -> SearchResult<String> {
    let status = response.status();
    let mut body = response.text().await?;

    if !status.is_success() {
        if body.len() > MAX_ERROR_BODY {
            let mut end = MAX_ERROR_BODY;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            body.truncate(end);
        }
        return Err(SearchError::Status {
            backend,
            status: status.as_u16(),
            body,
        });
    }

    Ok(body)
}

/// Build the backend selected in the configuration
pub fn from_config(config: &Config) -> SearchResult<Arc<dyn SearchBackend>> {
    let backend: Arc<dyn SearchBackend> = match config.search.backend {
        BackendKind::DuckDuckGo => Arc::new(duckduckgo::DuckDuckGoBackend::new(
            config.duckduckgo.clone(),
        )?),
        BackendKind::SearXNG => Arc::new(searxng::SearXNGBackend::new(config.searxng.clone())?),
    };
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceilings_and_defaults() {
        assert_eq!(BackendKind::DuckDuckGo.max_results_ceiling(), 10);
        assert_eq!(BackendKind::DuckDuckGo.default_max_results(), 5);
        assert_eq!(BackendKind::SearXNG.max_results_ceiling(), 30);
        assert_eq!(BackendKind::SearXNG.default_max_results(), 10);
    }

    #[test]
    fn test_parse_backend_kind() {
        assert_eq!("SearXNG".parse::<BackendKind>().unwrap(), BackendKind::SearXNG);
        assert_eq!("ddg".parse::<BackendKind>().unwrap(), BackendKind::DuckDuckGo);
        assert!("bing".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_from_config_selects_backend() {
        let mut config = Config::default();
        config.search.backend = BackendKind::SearXNG;
        let backend = from_config(&config).unwrap();
        assert_eq!(backend.kind(), BackendKind::SearXNG);
        assert_eq!(backend.name(), "searxng");
    }
}
