//! User-facing strings
//!
//! The summary text and the upstream failure messages are localized; error
//! codes and `unknown tool` messages are not.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::SearchCategory;

/// Language used for summaries and failure messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh-CN")]
    ZhCn,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            "zh" | "zh-cn" => Ok(Locale::ZhCn),
            other => Err(format!("unsupported locale '{}'", other)),
        }
    }
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::ZhCn => "zh-CN",
        }
    }

    /// Sentinel returned by the summary tool when nothing was found
    pub fn no_results(&self) -> &'static str {
        match self {
            Locale::En => "No results found",
            Locale::ZhCn => "未找到相关结果",
        }
    }

    pub fn summary_header(&self, query: &str, count: usize) -> String {
        match self {
            Locale::En => format!("Search \"{}\" returned {} results:", query, count),
            Locale::ZhCn => format!("搜索「{}」找到 {} 个结果：", query, count),
        }
    }

    pub fn source_label(&self) -> &'static str {
        match self {
            Locale::En => "Source: ",
            Locale::ZhCn => "来源：",
        }
    }

    pub fn published_label(&self) -> &'static str {
        match self {
            Locale::En => "Published: ",
            Locale::ZhCn => "发布时间：",
        }
    }

    pub fn link_label(&self) -> &'static str {
        match self {
            Locale::En => "Link: ",
            Locale::ZhCn => "链接：",
        }
    }

    /// Message for a backend failure in the given category
    pub fn search_failed(&self, category: SearchCategory, reason: &str) -> String {
        match (self, category) {
            (Locale::En, SearchCategory::Web) => format!("Search failed: {}", reason),
            (Locale::En, SearchCategory::News) => format!("News search failed: {}", reason),
            (Locale::En, SearchCategory::Image) => format!("Image search failed: {}", reason),
            (Locale::ZhCn, SearchCategory::Web) => format!("搜索失败：{}", reason),
            (Locale::ZhCn, SearchCategory::News) => format!("新闻搜索失败：{}", reason),
            (Locale::ZhCn, SearchCategory::Image) => format!("图片搜索失败：{}", reason),
        }
    }
}
