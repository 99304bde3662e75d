//! Request and result types shared by the backends, the normalizer and the
//! dispatcher.
//!
//! Everything here is request-scoped: a value is built inside one tool call
//! and dropped when the call returns.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A record as the provider returned it. Keys vary by backend and category.
pub type RawResult = serde_json::Map<String, serde_json::Value>;

/// Which backend operation and output schema apply to a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchCategory {
    Web,
    News,
    Image,
}

impl SearchCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchCategory::Web => "web",
            SearchCategory::News => "news",
            SearchCategory::Image => "image",
        }
    }
}

impl fmt::Display for SearchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A query ready to be handed to a backend.
///
/// `max_results` has already been clamped by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub max_results: usize,
    pub category: SearchCategory,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, max_results: usize, category: SearchCategory) -> Self {
        Self {
            text: text.into(),
            max_results,
            category,
        }
    }
}

/// A normalized web search result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebResult {
    /// The title of the page
    pub title: String,
    /// The URL of the page
    pub url: String,
    /// A description or snippet of the page
    pub snippet: String,
    /// The site or engine the result came from
    pub source: String,
    /// When the page was published, if the backend reports it
    #[serde(
        rename = "publishedDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub published_date: Option<String>,
}

/// A normalized news search result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsResult {
    /// The headline
    pub title: String,
    /// The URL of the article
    pub url: String,
    /// A description or excerpt of the article
    pub snippet: String,
    /// The publisher
    pub source: String,
    /// Publication date as reported by the backend
    pub date: String,
}

/// A normalized image search result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResult {
    /// The title/alt text of the image
    pub title: String,
    /// The full size image URL
    pub image_url: String,
    /// The thumbnail URL
    pub thumbnail: String,
    /// The page or engine the image came from
    pub source: String,
    /// Image width in pixels, empty when unknown
    pub width: String,
    /// Image height in pixels, empty when unknown
    pub height: String,
}

/// A normalized result sequence for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NormalizedResults {
    Web(Vec<WebResult>),
    News(Vec<NewsResult>),
    Image(Vec<ImageResult>),
}

impl NormalizedResults {
    pub fn empty(category: SearchCategory) -> Self {
        match category {
            SearchCategory::Web => NormalizedResults::Web(Vec::new()),
            SearchCategory::News => NormalizedResults::News(Vec::new()),
            SearchCategory::Image => NormalizedResults::Image(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            NormalizedResults::Web(r) => r.len(),
            NormalizedResults::News(r) => r.len(),
            NormalizedResults::Image(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn category(&self) -> SearchCategory {
        match self {
            NormalizedResults::Web(_) => SearchCategory::Web,
            NormalizedResults::News(_) => SearchCategory::News,
            NormalizedResults::Image(_) => SearchCategory::Image,
        }
    }
}

/// The `{"error": "..."}` value handed to callers in place of a result list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub error: String,
}

impl ErrorResult {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// What a tool call produces once it leaves the dispatcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ToolOutput {
    /// A normalized result sequence (`web_search`, `news_search`, `image_search`)
    Results(NormalizedResults),
    /// Formatted text (`search_summary`)
    Summary(String),
    /// The call failed
    Error(ErrorResult),
}

impl ToolOutput {
    pub fn error(message: impl Into<String>) -> Self {
        ToolOutput::Error(ErrorResult::new(message))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ToolOutput::Error(_))
    }

    /// Render as the JSON value the caller receives
    pub fn to_value(&self) -> serde_json::Value {
        // Every variant is made of strings and string-keyed structs.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
