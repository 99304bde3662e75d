//! Tool dispatcher
//!
//! Takes a tool name and a JSON argument object, validates and clamps the
//! arguments, runs the backend and the normalizer, and turns the outcome into
//! a [`ToolOutput`]. Holds no per-call state, so one instance serves every
//! caller concurrently.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::backends::{self, SearchBackend};
use crate::config::{Config, EmptyQueryPolicy};
use crate::error::{SearchError, SearchResult};
use crate::locale::Locale;
use crate::normalize::normalize;
use crate::summary::summarize;
use crate::types::{NormalizedResults, SearchCategory, SearchQuery, ToolOutput};

/// The tools the dispatcher recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    WebSearch,
    NewsSearch,
    ImageSearch,
    SearchSummary,
}

impl ToolName {
    pub const ALL: [ToolName; 4] = [
        ToolName::WebSearch,
        ToolName::NewsSearch,
        ToolName::ImageSearch,
        ToolName::SearchSummary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::WebSearch => "web_search",
            ToolName::NewsSearch => "news_search",
            ToolName::ImageSearch => "image_search",
            ToolName::SearchSummary => "search_summary",
        }
    }

    /// Category the tool searches in
    pub fn category(&self) -> SearchCategory {
        match self {
            ToolName::WebSearch | ToolName::SearchSummary => SearchCategory::Web,
            ToolName::NewsSearch => SearchCategory::News,
            ToolName::ImageSearch => SearchCategory::Image,
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| SearchError::UnknownTool(s.to_string()))
    }
}

/// Routes tool calls to the configured backend
#[derive(Clone)]
pub struct Dispatcher {
    backend: Arc<dyn SearchBackend>,
    locale: Locale,
    empty_query: EmptyQueryPolicy,
}

impl Dispatcher {
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        locale: Locale,
        empty_query: EmptyQueryPolicy,
    ) -> Self {
        Self {
            backend,
            locale,
            empty_query,
        }
    }

    /// Build the backend named in the configuration and wrap it
    pub fn from_config(config: &Config) -> SearchResult<Self> {
        let backend = backends::from_config(config)?;
        Ok(Self::new(
            backend,
            config.search.locale,
            config.search.empty_query,
        ))
    }

    pub fn backend(&self) -> &dyn SearchBackend {
        self.backend.as_ref()
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn empty_query_policy(&self) -> EmptyQueryPolicy {
        self.empty_query
    }

    /// Limit actually sent to the backend for a requested `max_results`.
    ///
    /// Missing, non-numeric and non-positive values fall back to the backend
    /// default; anything above the backend ceiling is cut to the ceiling.
    pub fn effective_max_results(&self, requested: Option<&Value>) -> usize {
        let kind = self.backend.kind();
        let ceiling = kind.max_results_ceiling();

        let requested =
            requested.and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)));
        match requested {
            Some(n) if n > 0 => usize::try_from(n).unwrap_or(ceiling).min(ceiling),
            _ => kind.default_max_results().min(ceiling),
        }
    }

    fn query_arg(&self, args: &Value) -> SearchResult<String> {
        let query = args.get("query").and_then(Value::as_str).unwrap_or_default();

        if query.trim().is_empty() && self.empty_query == EmptyQueryPolicy::Reject {
            return Err(SearchError::MissingArgument("query"));
        }
        Ok(query.to_string())
    }

    /// Run one backend search and normalize the records
    pub async fn search(&self, query: &SearchQuery) -> SearchResult<NormalizedResults> {
        let raw = self.backend.search(query).await?;
        normalize(self.backend.kind(), query.category, &raw)
    }

    /// Message for a failed search; provider-reported errors pass through as-is
    fn failure_message(&self, category: SearchCategory, error: &SearchError) -> String {
        match error {
            SearchError::Reported(message) => message.clone(),
            other => self.locale.search_failed(category, &other.to_string()),
        }
    }

    /// Dispatch a tool call by name
    pub async fn dispatch(&self, tool: &str, args: &Value) -> ToolOutput {
        let tool: ToolName = match tool.parse() {
            Ok(tool) => tool,
            Err(e) => {
                tracing::warn!("Rejected call: {}", e);
                return ToolOutput::error(e.to_string());
            }
        };

        let query = match self.query_arg(args) {
            Ok(query) => query,
            Err(e) => {
                tracing::warn!("Rejected {} call: {}", tool, e);
                return ToolOutput::error(e.to_string());
            }
        };

        let category = tool.category();
        if !self.backend.supports(category) {
            let e = SearchError::UnsupportedCategory {
                backend: self.backend.name(),
                category,
            };
            tracing::warn!("Rejected {} call: {}", tool, e);
            return ToolOutput::error(e.to_string());
        }

        let max_results = match tool {
            ToolName::SearchSummary => self.effective_max_results(None),
            _ => self.effective_max_results(args.get("max_results")),
        };

        tracing::info!(
            "{} via {}: {} (limit: {})",
            tool,
            self.backend.name(),
            query,
            max_results
        );

        let search_query = SearchQuery::new(query, max_results, category);
        let outcome = self.search(&search_query).await;

        match &outcome {
            Ok(results) => tracing::debug!(
                "{} returned {} {} results",
                tool,
                results.len(),
                results.category()
            ),
            Err(e) if e.is_upstream() => tracing::warn!("{} failed [{}]: {}", tool, e.code(), e),
            Err(e) => tracing::error!("{} failed [{}]: {}", tool, e.code(), e),
        }

        match tool {
            ToolName::SearchSummary => match outcome {
                Err(e) if !matches!(e, SearchError::Reported(_)) => {
                    ToolOutput::Summary(self.failure_message(category, &e))
                }
                outcome => {
                    ToolOutput::Summary(summarize(self.locale, &search_query.text, &outcome))
                }
            },
            _ => match outcome {
                Ok(results) => ToolOutput::Results(results),
                Err(e) => ToolOutput::error(self.failure_message(category, &e)),
            },
        }
    }
}
