//! Search query composition.

use serde::Deserialize;

/// User-composed query parts, as received from the UI or CLI.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(default)]
    pub text_box_query: Option<String>,
    #[serde(default)]
    pub keyword1: Option<String>,
    #[serde(default)]
    pub keyword2: Option<String>,
    #[serde(default)]
    pub exclude_word: Option<String>,
}

impl SearchQuery {
    /// The query string sent to the search provider.
    pub fn to_query_string(&self) -> String {
        build_query(
            self.text_box_query.as_deref().unwrap_or(""),
            self.keyword1.as_deref().unwrap_or(""),
            self.keyword2.as_deref().unwrap_or(""),
            self.exclude_word.as_deref().unwrap_or(""),
        )
    }
}

/// Join free text and keywords with single spaces, then append `-exclude`.
///
/// Empty parts are skipped, so an absent exclude word never leaves a bare `-`.
pub fn build_query(text_box: &str, keyword1: &str, keyword2: &str, exclude: &str) -> String {
    let mut parts: Vec<String> = [text_box, keyword1, keyword2]
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    let exclude = exclude.trim().trim_start_matches('-');
    if !exclude.is_empty() {
        parts.push(format!("-{exclude}"));
    }

    parts.join(" ")
}
