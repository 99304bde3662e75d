//! SearXNG backend
//!
//! Implements the SearchBackend trait using a self-hosted SearXNG instance.
//! See: https://docs.searxng.org/dev/search_api.html

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::{read_body, BackendKind, SearchBackend};
use crate::config::SearXNGConfig;
use crate::error::{SearchError, SearchResult};
use crate::types::{RawResult, SearchCategory, SearchQuery};

/// SearXNG backend
pub struct SearXNGBackend {
    client: Client,
    config: SearXNGConfig,
}

impl SearXNGBackend {
    pub fn new(config: SearXNGConfig) -> SearchResult<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds);
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, config })
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.config.url.trim_end_matches('/'))
    }
}

/// Value of the `categories` parameter for a search category
fn category_param(category: SearchCategory) -> &'static str {
    match category {
        SearchCategory::Web => "general",
        SearchCategory::News => "news",
        SearchCategory::Image => "images",
    }
}

// SearXNG API response; records are kept as-is for the normalizer
#[derive(Debug, Deserialize)]
struct SearXNGResponse {
    #[serde(default)]
    results: Vec<RawResult>,
}

#[async_trait]
impl SearchBackend for SearXNGBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::SearXNG
    }

    fn is_available(&self) -> bool {
        !self.config.url.is_empty()
    }

    async fn search(&self, query: &SearchQuery) -> SearchResult<Vec<RawResult>> {
        if !self.is_available() {
            return Err(SearchError::NotConfigured("SearXNG URL"));
        }

        let mut params = vec![
            ("q", query.text.clone()),
            ("format", "json".to_string()),
            ("pageno", "1".to_string()),
            ("language", self.config.language.clone()),
            ("categories", category_param(query.category).to_string()),
        ];

        if !self.config.engines.is_empty() {
            params.push(("engines", self.config.engines.clone()));
        }

        tracing::debug!(
            "SearXNG {} search: {} (limit: {})",
            query.category,
            query.text,
            query.max_results
        );

        let response = self
            .client
            .get(self.search_url())
            .query(&params)
            .send()
            .await?;

        let body = read_body(self.name(), response).await?;
        let searxng_response: SearXNGResponse = serde_json::from_str(&body)?;

        Ok(searxng_response
            .results
            .into_iter()
            .take(query.max_results)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(url: String) -> SearXNGConfig {
        SearXNGConfig {
            url,
            ..Default::default()
        }
    }

    fn backend_for(server: &MockServer) -> SearXNGBackend {
        SearXNGBackend::new(test_config(server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_search_sends_expected_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "rust async"))
            .and(query_param("format", "json"))
            .and(query_param("pageno", "1"))
            .and(query_param("language", "zh-CN"))
            .and(query_param("categories", "general"))
            .and(header(
                "user-agent",
                format!("search-mcp/{}", env!("CARGO_PKG_VERSION")).as_str(),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"results": [{"title": "Result 1", "url": "https://example.com/1", "content": "Description 1", "engine": "bing"}]}"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let backend = backend_for(&mock_server);
        let query = SearchQuery::new("rust async", 10, SearchCategory::Web);
        let results = backend.search(&query).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["url"], "https://example.com/1");
        assert_eq!(results[0]["engine"], "bing");
    }

    #[tokio::test]
    async fn test_category_params() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("categories", "news"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"results": []}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("categories", "images"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"results": []}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let backend = backend_for(&mock_server);
        let news = backend
            .search(&SearchQuery::new("q", 5, SearchCategory::News))
            .await
            .unwrap();
        let images = backend
            .search(&SearchQuery::new("q", 5, SearchCategory::Image))
            .await
            .unwrap();

        assert!(news.is_empty());
        assert!(images.is_empty());
    }

    #[tokio::test]
    async fn test_engines_forwarded_when_configured() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("engines", "google,bing"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"results": []}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = SearXNGConfig {
            url: format!("{}/", mock_server.uri()),
            engines: "google,bing".to_string(),
            ..Default::default()
        };
        let backend = SearXNGBackend::new(config).unwrap();
        backend
            .search(&SearchQuery::new("q", 5, SearchCategory::Web))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_search_respects_limit() {
        let mock_server = MockServer::start().await;

        let response_json = r#"{
            "results": [
                {"title": "Result 1", "url": "https://example.com/1"},
                {"title": "Result 2", "url": "https://example.com/2"},
                {"title": "Result 3", "url": "https://example.com/3"}
            ]
        }"#;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(response_json))
            .mount(&mock_server)
            .await;

        let backend = backend_for(&mock_server);
        let results = backend
            .search(&SearchQuery::new("query", 2, SearchCategory::Web))
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[1]["title"], "Result 2");
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
            .mount(&mock_server)
            .await;

        let backend = backend_for(&mock_server);
        let err = backend
            .search(&SearchQuery::new("query", 5, SearchCategory::Web))
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::Status { status: 429, .. }));
        assert_eq!(err.code(), "upstream_failure");
    }

    #[tokio::test]
    async fn test_malformed_json_is_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&mock_server)
            .await;

        let backend = backend_for(&mock_server);
        let err = backend
            .search(&SearchQuery::new("query", 5, SearchCategory::Web))
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_error() {
        // Nothing listens on port 9 locally
        let backend = SearXNGBackend::new(test_config("http://127.0.0.1:9".to_string())).unwrap();
        let err = backend
            .search(&SearchQuery::new("query", 5, SearchCategory::Web))
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::Request(_)));
    }

    #[tokio::test]
    async fn test_unconfigured_url() {
        let backend = SearXNGBackend::new(test_config(String::new())).unwrap();
        assert!(!backend.is_available());
        let err = backend
            .search(&SearchQuery::new("query", 5, SearchCategory::Web))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "not_configured");
    }
}
