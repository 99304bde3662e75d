//! MCP Server implementation for search
//!
//! This module defines the MCP server that exposes the search tools. Every
//! tool forwards its arguments to the [`Dispatcher`], so an MCP call and a
//! direct `dispatch` call behave the same.

use anyhow::Result;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo, Tool},
    tool, tool_handler, tool_router, ErrorData as McpError,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::{Config, EmptyQueryPolicy};
use crate::dispatch::{Dispatcher, ToolName};
use crate::locale::Locale;
use crate::types::ToolOutput;

/// The Search MCP Server
#[derive(Clone)]
pub struct SearchMcpServer {
    dispatcher: Dispatcher,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Parameter Types
// ============================================================================
//
// A missing query and a fractional limit pass through unchanged; the
// dispatcher applies the empty-query policy and the limit clamping.

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// The search query
    #[schemars(description = "The search query string")]
    #[serde(default)]
    pub query: String,
    /// Maximum number of results to return
    #[schemars(
        description = "Maximum number of results to return (default 5 on DuckDuckGo, 10 on SearXNG; capped at 10 and 30)"
    )]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct NewsSearchParams {
    /// The search query
    #[schemars(description = "The news search query string")]
    #[serde(default)]
    pub query: String,
    /// Maximum number of results to return
    #[schemars(
        description = "Maximum number of results to return (default 5 on DuckDuckGo, 10 on SearXNG; capped at 10 and 30)"
    )]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ImageSearchParams {
    /// The search query
    #[schemars(description = "The image search query string")]
    #[serde(default)]
    pub query: String,
    /// Maximum number of results to return
    #[schemars(
        description = "Maximum number of results to return (default 5 on DuckDuckGo, 10 on SearXNG; capped at 10 and 30)"
    )]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SummaryParams {
    /// The search query
    #[schemars(description = "The search query to summarize results for")]
    #[serde(default)]
    pub query: String,
}

// ============================================================================
// Tool Router Implementation
// ============================================================================

#[tool_router]
impl SearchMcpServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            tool_router: Self::tool_router(),
        }
    }

    // ========================================================================
    // Search Tools
    // ========================================================================

    #[tool(description = "Search the web. Returns a list of results with title, url, snippet and source.")]
    async fn web_search(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        self.call(ToolName::WebSearch, &params).await
    }

    #[tool(description = "Search for news articles. Returns title, url, snippet, source and date.")]
    async fn news_search(
        &self,
        Parameters(params): Parameters<NewsSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        self.call(ToolName::NewsSearch, &params).await
    }

    #[tool(description = "Search for images. Returns title, image_url, thumbnail, source, width and height.")]
    async fn image_search(
        &self,
        Parameters(params): Parameters<ImageSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        self.call(ToolName::ImageSearch, &params).await
    }

    #[tool(description = "Search the web and return the results as a readable text summary.")]
    async fn search_summary(
        &self,
        Parameters(params): Parameters<SummaryParams>,
    ) -> Result<CallToolResult, McpError> {
        self.call(ToolName::SearchSummary, &params).await
    }

    #[tool(description = "Get the current search backend configuration and status.")]
    async fn search_status(&self) -> Result<CallToolResult, McpError> {
        #[derive(Serialize)]
        struct BackendStatus {
            backend: &'static str,
            available: bool,
            max_results_ceiling: usize,
            default_max_results: usize,
            locale: Locale,
            empty_query: EmptyQueryPolicy,
        }

        let backend = self.dispatcher.backend();
        let status = BackendStatus {
            backend: backend.name(),
            available: backend.is_available(),
            max_results_ceiling: backend.kind().max_results_ceiling(),
            default_max_results: backend.kind().default_max_results(),
            locale: self.dispatcher.locale(),
            empty_query: self.dispatcher.empty_query_policy(),
        };

        json_success(&status)
    }
}

impl SearchMcpServer {
    /// Build the server from configuration, warning when the backend looks
    /// unusable
    pub fn from_config(config: &Config) -> Result<Self> {
        let dispatcher = Dispatcher::from_config(config)?;
        let backend = dispatcher.backend();
        tracing::info!("Using {} backend", backend.name());

        if !backend.is_available() {
            tracing::warn!(
                "Backend '{}' is not available (check its URL configuration)",
                backend.name()
            );
        }

        Ok(Self::new(dispatcher))
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// All tools with their schemas
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    async fn call<P: Serialize>(
        &self,
        tool: ToolName,
        params: &P,
    ) -> Result<CallToolResult, McpError> {
        let args = serde_json::to_value(params)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        let output = self.dispatcher.dispatch(tool.as_str(), &args).await;
        into_call_result(&output)
    }
}

fn json_success<T: Serialize>(data: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Results go out as pretty JSON, summaries as plain text, failures as an
/// error result carrying the `{"error": ...}` JSON
fn into_call_result(output: &ToolOutput) -> Result<CallToolResult, McpError> {
    match output {
        ToolOutput::Results(results) => json_success(results),
        ToolOutput::Summary(text) => Ok(CallToolResult::success(vec![Content::text(text.clone())])),
        ToolOutput::Error(error) => {
            let json = serde_json::to_string(error)
                .map_err(|e| McpError::internal_error(e.to_string(), None))?;
            Ok(CallToolResult::error(vec![Content::text(json)]))
        }
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl rmcp::ServerHandler for SearchMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Search MCP Server - provides web, news and image search plus a \
                 text summary tool, backed by DuckDuckGo or a SearXNG instance. \
                 No API keys required."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
