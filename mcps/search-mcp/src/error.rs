//! Error types for search calls
//!
//! Adapters and the normalizer report failures through [`SearchError`]; the
//! dispatcher is the only place that turns one into the `{"error": ...}` value
//! a caller sees.

use thiserror::Error;

use crate::types::SearchCategory;

/// Errors that can occur while serving a search tool call
#[derive(Error, Debug)]
pub enum SearchError {
    /// The HTTP request failed (connect, timeout, body read)
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-success status
    #[error("{backend} returned HTTP {status}: {body}")]
    Status {
        backend: &'static str,
        status: u16,
        body: String,
    },

    /// The provider body was not the JSON we expected
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The backend is missing required configuration
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// The provider page could not be scraped
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// A provider record carried an `error` key
    #[error("{0}")]
    Reported(String),

    /// The tool name is not one the dispatcher knows
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// A required argument was absent or empty
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    /// The configured backend has no operation for this category
    #[error("{backend} does not support {category} search")]
    UnsupportedCategory {
        backend: &'static str,
        category: SearchCategory,
    },
}

impl SearchError {
    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            SearchError::Request(_)
            | SearchError::Status { .. }
            | SearchError::Decode(_)
            | SearchError::Parse(_)
            | SearchError::Reported(_) => "upstream_failure",
            SearchError::NotConfigured(_) => "not_configured",
            SearchError::UnknownTool(_) => "unknown_tool",
            SearchError::MissingArgument(_) => "missing_argument",
            SearchError::UnsupportedCategory { .. } => "unsupported_category",
        }
    }

    /// True when the failure came from the backend provider
    pub fn is_upstream(&self) -> bool {
        self.code() == "upstream_failure"
    }
}

/// Result type alias for search operations
pub type SearchResult<T> = Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tool_message() {
        let err = SearchError::UnknownTool("unknown_tool".to_string());
        assert_eq!(err.to_string(), "unknown tool: unknown_tool");
        assert_eq!(err.code(), "unknown_tool");
        assert!(!err.is_upstream());
    }

    #[test]
    fn test_reported_message_is_verbatim() {
        let err = SearchError::Reported("x".to_string());
        assert_eq!(err.to_string(), "x");
        assert!(err.is_upstream());
    }

    #[test]
    fn test_unsupported_category_message() {
        let err = SearchError::UnsupportedCategory {
            backend: "searxng",
            category: SearchCategory::Image,
        };
        assert_eq!(err.to_string(), "searxng does not support image search");
        assert_eq!(err.code(), "unsupported_category");
    }

    #[test]
    fn test_decode_is_upstream() {
        let err: SearchError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert_eq!(err.code(), "upstream_failure");
    }
}
