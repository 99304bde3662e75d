//! Search MCP Library
//!
//! Web, news and image search over MCP, backed by DuckDuckGo or a
//! self-hosted SearXNG instance.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use search_mcp::{Config, Dispatcher};
//!
//! let dispatcher = Dispatcher::from_config(&Config::load()?)?;
//! let output = dispatcher
//!     .dispatch("web_search", &serde_json::json!({"query": "rust", "max_results": 3}))
//!     .await;
//! println!("{}", output.to_value());
//! ```
//!
//! # Configuration
//! Set `SEARCH_BACKEND` / `SEARXNG_URL` or configure in `~/.binks/search.toml`

pub mod backends;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod locale;
pub mod logging;
pub mod normalize;
pub mod server;
pub mod summary;
pub mod transport;
pub mod types;

// Re-export main server type
pub use server::SearchMcpServer;

// Re-export parameter types for direct API usage
pub use server::{ImageSearchParams, NewsSearchParams, SearchParams, SummaryParams};

pub use backends::{BackendKind, SearchBackend};
pub use config::{Config, EmptyQueryPolicy};
pub use dispatch::{Dispatcher, ToolName};
pub use error::SearchError;
pub use locale::Locale;
pub use types::{
    ErrorResult, ImageResult, NewsResult, NormalizedResults, RawResult, SearchCategory,
    SearchQuery, ToolOutput, WebResult,
};
