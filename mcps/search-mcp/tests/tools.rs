//! End-to-end tests for the tool dispatcher
//!
//! Each test drives `Dispatcher::dispatch` against a mocked SearXNG instance,
//! so the whole path (argument handling, HTTP request, normalization,
//! summary formatting) is exercised without network access.

use search_mcp::{BackendKind, Config, Dispatcher, EmptyQueryPolicy, ToolOutput};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn dispatcher_for(server: &MockServer) -> Dispatcher {
    let mut config = Config::default();
    config.search.backend = BackendKind::SearXNG;
    config.searxng.url = server.uri();
    Dispatcher::from_config(&config).unwrap()
}

fn records(count: usize) -> Value {
    let results: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "title": format!("Result {}", i),
                "url": format!("https://example.com/{}", i),
                "content": format!("Snippet {}", i),
                "engine": "duckduckgo",
                "publishedDate": "2025-03-01T12:00:00"
            })
        })
        .collect();
    json!({ "query": "test", "number_of_results": count, "results": results })
}

async fn mount_results(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn web_search_returns_normalized_results_in_order() {
    let server = MockServer::start().await;
    mount_results(&server, records(2)).await;

    let output = dispatcher_for(&server)
        .dispatch("web_search", &json!({"query": "test", "max_results": 5}))
        .await;

    assert_eq!(
        output.to_value(),
        json!([
            {
                "title": "Result 0",
                "url": "https://example.com/0",
                "snippet": "Snippet 0",
                "source": "duckduckgo",
                "publishedDate": "2025-03-01T12:00:00"
            },
            {
                "title": "Result 1",
                "url": "https://example.com/1",
                "snippet": "Snippet 1",
                "source": "duckduckgo",
                "publishedDate": "2025-03-01T12:00:00"
            }
        ])
    );
}

#[tokio::test]
async fn oversized_request_is_capped_at_ceiling() {
    let server = MockServer::start().await;
    mount_results(&server, records(45)).await;

    let output = dispatcher_for(&server)
        .dispatch("web_search", &json!({"query": "test", "max_results": 999}))
        .await;

    assert_eq!(output.to_value().as_array().unwrap().len(), 30);
}

#[tokio::test]
async fn news_search_maps_dates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("categories", "news"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records(3)))
        .expect(1)
        .mount(&server)
        .await;

    let output = dispatcher_for(&server)
        .dispatch("news_search", &json!({"query": "test", "max_results": 2}))
        .await;

    let value = output.to_value();
    let items = value.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["date"], "2025-03-01T12:00:00");
    assert_eq!(items[0]["source"], "duckduckgo");
}

#[tokio::test]
async fn zero_records_is_empty_list_and_summary_sentinel() {
    let server = MockServer::start().await;
    mount_results(&server, records(0)).await;

    let dispatcher = dispatcher_for(&server);

    let output = dispatcher.dispatch("web_search", &json!({"query": "test"})).await;
    assert_eq!(output.to_value(), json!([]));

    let output = dispatcher
        .dispatch("search_summary", &json!({"query": "test"}))
        .await;
    assert_eq!(output, ToolOutput::Summary("No results found".to_string()));
}

#[tokio::test]
async fn summary_renders_numbered_blocks() {
    let server = MockServer::start().await;
    mount_results(&server, records(2)).await;

    let output = dispatcher_for(&server)
        .dispatch("search_summary", &json!({"query": "test"}))
        .await;

    let ToolOutput::Summary(text) = output else {
        panic!("expected a summary");
    };
    assert!(text.starts_with("Search \"test\" returned 2 results:\n\n1. **Result 0**\n"));
    assert!(text.contains("   Published: 2025-03-01T12:00:00\n   Link: https://example.com/1\n\n"));
}

#[tokio::test]
async fn unknown_tool_sends_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records(1)))
        .expect(0)
        .mount(&server)
        .await;

    let output = dispatcher_for(&server)
        .dispatch("unknown_tool", &json!({"query": "test"}))
        .await;

    assert_eq!(output.to_value(), json!({"error": "unknown tool: unknown_tool"}));
}

#[tokio::test]
async fn malformed_body_becomes_error_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let output = dispatcher_for(&server)
        .dispatch("web_search", &json!({"query": "test"}))
        .await;

    assert!(output.is_error());
    let value = output.to_value();
    assert!(value["error"]
        .as_str()
        .unwrap()
        .starts_with("Search failed: malformed response"));
}

#[tokio::test]
async fn failures_do_not_leak_into_later_calls() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "bad"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "good"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records(1)))
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server);

    let first = dispatcher.dispatch("web_search", &json!({"query": "bad"})).await;
    assert!(first.is_error());

    let second = dispatcher.dispatch("web_search", &json!({"query": "good"})).await;
    assert_eq!(second.to_value().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn forwarded_empty_query_reaches_backend() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", ""))
        .respond_with(ResponseTemplate::new(400).set_body_string("empty query"))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.search.backend = BackendKind::SearXNG;
    config.search.empty_query = EmptyQueryPolicy::Forward;
    config.searxng.url = server.uri();
    let dispatcher = Dispatcher::from_config(&config).unwrap();

    let output = dispatcher.dispatch("web_search", &json!({})).await;
    assert_eq!(
        output.to_value(),
        json!({"error": "Search failed: searxng returned HTTP 400: empty query"})
    );
}
