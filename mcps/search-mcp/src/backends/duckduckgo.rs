//! DuckDuckGo backend
//!
//! Text search scrapes the html endpoint (`/html/`). News and image search
//! use the JSON endpoints behind the main site (`news.js`, `i.js`), which need
//! a `vqd` token taken from a plain query page first, so those two
//! categories cost two requests per search: the token fetch and the JSON
//! call. Text search is a single request.
//!
//! Records are shaped like the ones the DuckDuckGo client libraries yield:
//! text `{title, href, body, source}`, news `{date, title, body, url, image,
//! source}`, images `{title, image, thumbnail, url, height, width, source}`.

use async_trait::async_trait;
use regex::Regex;
use reqwest::{header::REFERER, Client, StatusCode};
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

use super::{read_body, BackendKind, SearchBackend};
use crate::config::DuckDuckGoConfig;
use crate::error::{SearchError, SearchResult};
use crate::types::{RawResult, SearchCategory, SearchQuery};

static RESULT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.result").unwrap());
static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.result__a").unwrap());
static SNIPPET_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".result__snippet").unwrap());
static SOURCE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".result__url").unwrap());
static CHALLENGE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".anomaly-modal__title, #challenge-form").unwrap());
static VQD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"vqd=["']?([0-9-]+)"#).unwrap());

/// DuckDuckGo backend
pub struct DuckDuckGoBackend {
    client: Client,
    config: DuckDuckGoConfig,
}

impl DuckDuckGoBackend {
    pub fn new(config: DuckDuckGoConfig) -> SearchResult<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { client, config })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url.trim_end_matches('/'), path)
    }

    fn referer(&self) -> String {
        self.api_url("")
    }

    async fn text(&self, query: &SearchQuery) -> SearchResult<Vec<RawResult>> {
        let url = format!("{}/html/", self.config.html_url.trim_end_matches('/'));

        let response = self
            .client
            .get(url)
            .query(&[("q", query.text.as_str()), ("kl", self.config.region.as_str())])
            .header(REFERER, self.referer())
            .send()
            .await?;

        // The html endpoint answers 202 with an empty page when rate limiting
        if response.status() == StatusCode::ACCEPTED {
            return Err(SearchError::Status {
                backend: self.name(),
                status: StatusCode::ACCEPTED.as_u16(),
                body: "rate limited".to_string(),
            });
        }

        let html = read_body(self.name(), response).await?;
        parse_html_results(&html, query.max_results)
    }

    /// Fetch the `vqd` token the JSON endpoints require
    async fn vqd(&self, query: &str) -> SearchResult<String> {
        let response = self
            .client
            .get(self.referer())
            .query(&[("q", query)])
            .send()
            .await?;

        let body = read_body(self.name(), response).await?;
        extract_vqd(&body)
            .ok_or_else(|| SearchError::Parse("DuckDuckGo did not return a vqd token".to_string()))
    }

    async fn news(&self, query: &SearchQuery) -> SearchResult<Vec<RawResult>> {
        let vqd = self.vqd(&query.text).await?;

        let response = self
            .client
            .get(self.api_url("news.js"))
            .query(&[
                ("l", self.config.region.as_str()),
                ("o", "json"),
                ("noamp", "1"),
                ("q", query.text.as_str()),
                ("vqd", vqd.as_str()),
                ("p", "-1"),
            ])
            .header(REFERER, self.referer())
            .send()
            .await?;

        let body = read_body(self.name(), response).await?;
        let page: JsonPage = serde_json::from_str(&body)?;

        Ok(page
            .results
            .into_iter()
            .take(query.max_results)
            .map(reshape_news)
            .collect())
    }

    async fn images(&self, query: &SearchQuery) -> SearchResult<Vec<RawResult>> {
        let vqd = self.vqd(&query.text).await?;

        let response = self
            .client
            .get(self.api_url("i.js"))
            .query(&[
                ("l", self.config.region.as_str()),
                ("o", "json"),
                ("q", query.text.as_str()),
                ("vqd", vqd.as_str()),
                ("f", ",,,,,"),
                ("p", "1"),
            ])
            .header(REFERER, self.referer())
            .send()
            .await?;

        let body = read_body(self.name(), response).await?;
        let page: JsonPage = serde_json::from_str(&body)?;

        Ok(page.results.into_iter().take(query.max_results).collect())
    }
}

#[async_trait]
impl SearchBackend for DuckDuckGoBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::DuckDuckGo
    }

    fn is_available(&self) -> bool {
        !self.config.html_url.is_empty() && !self.config.api_url.is_empty()
    }

    async fn search(&self, query: &SearchQuery) -> SearchResult<Vec<RawResult>> {
        tracing::debug!(
            "DuckDuckGo {} search: {} (limit: {})",
            query.category,
            query.text,
            query.max_results
        );

        match query.category {
            SearchCategory::Web => self.text(query).await,
            SearchCategory::News => self.news(query).await,
            SearchCategory::Image => self.images(query).await,
        }
    }
}

// news.js / i.js response
#[derive(Debug, Deserialize)]
struct JsonPage {
    #[serde(default)]
    results: Vec<RawResult>,
}

fn extract_vqd(body: &str) -> Option<String> {
    VQD_RE
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve DuckDuckGo redirect links (`//duckduckgo.com/l/?uddg=...`)
fn decode_result_url(href: &str) -> String {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else if href.starts_with('/') {
        format!("https://duckduckgo.com{}", href)
    } else {
        href.to_string()
    };

    match Url::parse(&absolute) {
        Ok(url) => url
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, target)| target.into_owned())
            .unwrap_or(absolute),
        Err(_) => href.to_string(),
    }
}

fn parse_html_results(html: &str, limit: usize) -> SearchResult<Vec<RawResult>> {
    let document = Html::parse_document(html);
    let mut results = Vec::new();

    for result in document.select(&RESULT_SELECTOR) {
        if results.len() >= limit {
            break;
        }

        let is_ad = result
            .value()
            .classes()
            .any(|class| class == "result--ad");
        if is_ad {
            continue;
        }

        let Some(anchor) = result.select(&TITLE_SELECTOR).next() else {
            continue;
        };

        let href = anchor
            .value()
            .attr("href")
            .map(decode_result_url)
            .unwrap_or_default();
        let body = result
            .select(&SNIPPET_SELECTOR)
            .next()
            .map(element_text)
            .unwrap_or_default();
        let source = result
            .select(&SOURCE_SELECTOR)
            .next()
            .map(element_text)
            .unwrap_or_default();

        let mut record = RawResult::new();
        record.insert("title".to_string(), Value::String(element_text(anchor)));
        record.insert("href".to_string(), Value::String(href));
        record.insert("body".to_string(), Value::String(body));
        record.insert("source".to_string(), Value::String(source));
        results.push(record);
    }

    if results.is_empty() && document.select(&CHALLENGE_SELECTOR).next().is_some() {
        return Err(SearchError::Parse(
            "DuckDuckGo answered with a bot challenge".to_string(),
        ));
    }

    Ok(results)
}

/// Map a news.js record onto `{date, title, body, url, image, source}`
fn reshape_news(mut record: RawResult) -> RawResult {
    let date = match record.remove("date") {
        Some(Value::Number(ts)) => ts
            .as_i64()
            .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
            .map(|dt| Value::String(dt.to_rfc3339()))
            .unwrap_or(Value::Null),
        Some(other) => other,
        None => Value::Null,
    };

    let mut shaped = RawResult::new();
    shaped.insert("date".to_string(), date);
    for (from, to) in [
        ("title", "title"),
        ("excerpt", "body"),
        ("url", "url"),
        ("image", "image"),
        ("source", "source"),
    ] {
        if let Some(value) = record.remove(from) {
            shaped.insert(to.to_string(), value);
        }
    }
    shaped
}
