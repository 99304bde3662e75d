//! Renders web results as one text block for the `search_summary` tool

use std::fmt::Write;

use crate::error::SearchResult;
use crate::locale::Locale;
use crate::types::{NormalizedResults, WebResult};

/// Format web results as numbered blocks under a header line.
///
/// Each block is: index and title, body, source, publish date when known,
/// link. Blocks are separated by a blank line. An empty list gives the
/// locale's "no results" sentinel.
pub fn format_summary(locale: Locale, query: &str, results: &[WebResult]) -> String {
    if results.is_empty() {
        return locale.no_results().to_string();
    }

    let mut summary = locale.summary_header(query, results.len());
    summary.push_str("\n\n");

    for (i, result) in results.iter().enumerate() {
        // Writing into a String cannot fail
        let _ = writeln!(summary, "{}. **{}**", i + 1, result.title);
        let _ = writeln!(summary, "   {}", result.snippet);
        let _ = writeln!(summary, "   {}{}", locale.source_label(), result.source);
        if let Some(date) = result.published_date.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(summary, "   {}{}", locale.published_label(), date);
        }
        let _ = writeln!(summary, "   {}{}", locale.link_label(), result.url);
        summary.push('\n');
    }

    summary
}

/// Summary of a normalization outcome; failures and non-web results read as
/// "no results"
pub fn summarize(locale: Locale, query: &str, outcome: &SearchResult<NormalizedResults>) -> String {
    match outcome {
        Ok(NormalizedResults::Web(results)) => format_summary(locale, query, results),
        Ok(_) | Err(_) => locale.no_results().to_string(),
    }
}
