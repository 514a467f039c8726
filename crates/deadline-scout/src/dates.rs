//! Expiry date extraction.
//!
//! The whole lower-cased body text of a page is treated as one blob. When the
//! blob contains an expiry-intent phrase, every surface pattern is run over
//! the *entire* blob, not just the text near the phrase. Raw matches are then
//! normalized against an ordered list of candidate syntaxes and anything that
//! does not resolve to a real calendar date is dropped.
//!
//! Two scan modes exist:
//!
//! - [`ScanMode::PerKeyword`] rescans the blob once per matching phrase, so a
//!   date appears once for every phrase present on the page.
//! - [`ScanMode::Deduplicated`] scans once if any phrase matches and reports
//!   each canonical date once, in first-seen order.

use crate::keywords::KeywordSets;
use chrono::NaiveDate;
use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

/// Surface syntaxes used to pull raw date substrings out of page text.
const DATE_PATTERNS: [&str; 4] = [
    // 24th march 2024
    r"\b\d{1,2}(?:th|st|nd|rd)?\s+\w+\s+\d{4}\b",
    // 24/04/2024
    r"\b\d{1,2}/\d{1,2}/\d{4}\b",
    // march 24 2024, march 24, 2024
    r"\b\w+\s+\d{1,2},?\s+\d{4}\b",
    // 31.07.2024
    r"\b\d{1,2}\.\d{1,2}\.\d{4}\b",
];

/// Candidate syntaxes tried in order when normalizing a raw match.
///
/// `%B` accepts full and abbreviated month names in any case.
const CANDIDATE_FORMATS: [&str; 4] = ["%d %B %Y", "%d/%m/%Y", "%B %d %Y", "%d.%m.%Y"];

/// Canonical output layout.
const CANONICAL_FORMAT: &str = "%Y-%m-%d";

fn date_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        DATE_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("date pattern is valid"))
            .collect()
    })
}

fn ordinal_suffix() -> &'static Regex {
    static ORDINAL: OnceLock<Regex> = OnceLock::new();
    ORDINAL.get_or_init(|| {
        Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)\b").expect("ordinal regex is valid")
    })
}

fn body_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("body").expect("body selector is valid"))
}

/// How often the page blob is rescanned for dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// One full scan per matching expiry phrase; duplicates kept.
    #[default]
    PerKeyword,
    /// One full scan if any phrase matches; each date reported once.
    Deduplicated,
}

/// Extracts canonical expiry dates from raw markup.
#[derive(Debug, Clone)]
pub struct DateExtractor {
    phrases: Arc<[String]>,
    mode: ScanMode,
}

impl DateExtractor {
    pub fn new(keywords: &KeywordSets, mode: ScanMode) -> Self {
        Self {
            phrases: keywords.expiry_shared(),
            mode,
        }
    }

    pub fn scan_mode(&self) -> ScanMode {
        self.mode
    }

    /// Canonical `YYYY-MM-DD` dates found in the page, in first-seen order.
    pub fn extract(&self, html: &str) -> Vec<String> {
        if html.trim().is_empty() {
            return Vec::new();
        }
        let document = Html::parse_document(html);

        let mut raw = Vec::new();
        for body in document.select(body_selector()) {
            let blob = body.text().collect::<String>().to_lowercase();
            self.collect_raw(&blob, &mut raw);
        }

        let mut dates: Vec<String> = raw
            .iter()
            .filter_map(|fragment| match normalize_date(fragment) {
                Some(date) => Some(date.format(CANONICAL_FORMAT).to_string()),
                None => {
                    tracing::debug!(fragment = %fragment, "skipping unparseable date fragment");
                    None
                }
            })
            .collect();

        if self.mode == ScanMode::Deduplicated {
            let mut seen = HashSet::new();
            dates.retain(|d| seen.insert(d.clone()));
        }

        dates
    }

    /// Push raw date substrings found in `blob` according to the scan mode.
    fn collect_raw(&self, blob: &str, out: &mut Vec<String>) {
        match self.mode {
            ScanMode::PerKeyword => {
                for phrase in self.phrases.iter() {
                    if blob.contains(phrase.as_str()) {
                        scan_blob(blob, out);
                    }
                }
            }
            ScanMode::Deduplicated => {
                if self.phrases.iter().any(|p| blob.contains(p.as_str())) {
                    scan_blob(blob, out);
                }
            }
        }
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new(KeywordSets::builtin(), ScanMode::default())
    }
}

/// Run every surface pattern over the blob, in pattern order.
fn scan_blob(blob: &str, out: &mut Vec<String>) {
    for pattern in date_patterns() {
        out.extend(pattern.find_iter(blob).map(|m| m.as_str().to_string()));
    }
}

/// Parse a raw date fragment against the candidate syntaxes.
///
/// Ordinal suffixes and the comma after the day are stripped and whitespace
/// collapsed before parsing. Returns `None` when no syntax yields a valid
/// calendar date.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = ordinal_suffix().replace_all(raw, "$1").replace(',', " ");
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        return None;
    }

    CANDIDATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&cleaned, fmt).ok())
}
