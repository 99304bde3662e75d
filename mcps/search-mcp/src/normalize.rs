//! Maps provider records into the fixed output schema
//!
//! Each (backend, category) pair has its own field table, so a key one
//! backend uses can never be read by mistake for the other. Normalization is
//! total: a missing or null field becomes an empty string.

use serde_json::Value;

use crate::backends::BackendKind;
use crate::error::{SearchError, SearchResult};
use crate::types::{
    ImageResult, NewsResult, NormalizedResults, RawResult, SearchCategory, WebResult,
};

/// Raw keys for a web result
struct WebFields {
    title: &'static str,
    url: &'static str,
    snippet: &'static str,
    source: &'static str,
    published: Option<&'static str>,
}

/// Raw keys for a news result
struct NewsFields {
    title: &'static str,
    url: &'static str,
    snippet: &'static str,
    source: &'static str,
    date: &'static str,
}

/// Where image dimensions come from
enum Dimensions {
    /// Separate width and height keys
    Keys {
        width: &'static str,
        height: &'static str,
    },
    /// One `"<w>x<h>"` / `"<w> x <h>"` key
    Combined(&'static str),
}

/// Raw keys for an image result
struct ImageFields {
    title: &'static str,
    image_url: &'static str,
    thumbnail: &'static str,
    source: &'static str,
    dimensions: Dimensions,
}

const DUCKDUCKGO_WEB: WebFields = WebFields {
    title: "title",
    url: "href",
    snippet: "body",
    source: "source",
    published: None,
};

const SEARXNG_WEB: WebFields = WebFields {
    title: "title",
    url: "url",
    snippet: "content",
    source: "engine",
    published: Some("publishedDate"),
};

const DUCKDUCKGO_NEWS: NewsFields = NewsFields {
    title: "title",
    url: "url",
    snippet: "body",
    source: "source",
    date: "date",
};

const SEARXNG_NEWS: NewsFields = NewsFields {
    title: "title",
    url: "url",
    snippet: "content",
    source: "engine",
    date: "publishedDate",
};

const DUCKDUCKGO_IMAGE: ImageFields = ImageFields {
    title: "title",
    image_url: "image",
    thumbnail: "thumbnail",
    source: "source",
    dimensions: Dimensions::Keys {
        width: "width",
        height: "height",
    },
};

const SEARXNG_IMAGE: ImageFields = ImageFields {
    title: "title",
    image_url: "img_src",
    thumbnail: "thumbnail_src",
    source: "engine",
    dimensions: Dimensions::Combined("resolution"),
};

fn web_fields(backend: BackendKind) -> &'static WebFields {
    match backend {
        BackendKind::DuckDuckGo => &DUCKDUCKGO_WEB,
        BackendKind::SearXNG => &SEARXNG_WEB,
    }
}

fn news_fields(backend: BackendKind) -> &'static NewsFields {
    match backend {
        BackendKind::DuckDuckGo => &DUCKDUCKGO_NEWS,
        BackendKind::SearXNG => &SEARXNG_NEWS,
    }
}

fn image_fields(backend: BackendKind) -> &'static ImageFields {
    match backend {
        BackendKind::DuckDuckGo => &DUCKDUCKGO_IMAGE,
        BackendKind::SearXNG => &SEARXNG_IMAGE,
    }
}

/// Read a field as a string; absent, null and structured values become `""`
fn field(raw: &RawResult, key: &str) -> String {
    match raw.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn optional_field(raw: &RawResult, key: &str) -> Option<String> {
    Some(field(raw, key)).filter(|s| !s.is_empty())
}

/// Split `"1920x1080"` or `"1920 x 1080"` into its parts
fn split_resolution(value: &str) -> (String, String) {
    match value.split_once(['x', 'X', '×']) {
        Some((w, h)) => (w.trim().to_string(), h.trim().to_string()),
        None => (String::new(), String::new()),
    }
}

fn web_result(raw: &RawResult, fields: &WebFields) -> WebResult {
    WebResult {
        title: field(raw, fields.title),
        url: field(raw, fields.url),
        snippet: field(raw, fields.snippet),
        source: field(raw, fields.source),
        published_date: fields.published.and_then(|key| optional_field(raw, key)),
    }
}

fn news_result(raw: &RawResult, fields: &NewsFields) -> NewsResult {
    NewsResult {
        title: field(raw, fields.title),
        url: field(raw, fields.url),
        snippet: field(raw, fields.snippet),
        source: field(raw, fields.source),
        date: field(raw, fields.date),
    }
}

fn image_result(raw: &RawResult, fields: &ImageFields) -> ImageResult {
    let (width, height) = match fields.dimensions {
        Dimensions::Keys { width, height } => (field(raw, width), field(raw, height)),
        Dimensions::Combined(key) => split_resolution(&field(raw, key)),
    };

    ImageResult {
        title: field(raw, fields.title),
        image_url: field(raw, fields.image_url),
        thumbnail: field(raw, fields.thumbnail),
        source: field(raw, fields.source),
        width,
        height,
    }
}

/// Normalize a backend's records for one category.
///
/// A first record carrying an `error` key is passed on as that error instead
/// of being mapped.
pub fn normalize(
    backend: BackendKind,
    category: SearchCategory,
    raw: &[RawResult],
) -> SearchResult<NormalizedResults> {
    if let Some(error) = raw.first().and_then(|first| first.get("error")) {
        let message = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(SearchError::Reported(message));
    }

    let results = match category {
        SearchCategory::Web => {
            let fields = web_fields(backend);
            NormalizedResults::Web(raw.iter().map(|r| web_result(r, fields)).collect())
        }
        SearchCategory::News => {
            let fields = news_fields(backend);
            NormalizedResults::News(raw.iter().map(|r| news_result(r, fields)).collect())
        }
        SearchCategory::Image => {
            let fields = image_fields(backend);
            NormalizedResults::Image(raw.iter().map(|r| image_result(r, fields)).collect())
        }
    };

    Ok(results)
}
