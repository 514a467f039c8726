//! Submission call-to-action detection.
//!
//! Walks every link, button and submit input in a page and checks its
//! lower-cased text against the submission-intent phrases. Inputs are also
//! checked by their `value` attribute. Matching is plain substring containment, so a phrase can fire
//! inside a longer word ("submit" inside "submitted"); that looseness is
//! accepted.
//!
//! Entry points are synchronous because `scraper` documents are `!Send`.

use crate::keywords::KeywordSets;
use scraper::{ElementRef, Html, Selector};
use std::sync::{Arc, OnceLock};

/// Elements a visitor can act on to submit or apply.
fn interactive_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| {
        Selector::parse("a, button, input[type=\"submit\"]")
            .expect("interactive selector is valid")
    })
}

/// Detects submission affordances in raw markup.
#[derive(Debug, Clone)]
pub struct SubmissionDetector {
    phrases: Arc<[String]>,
}

impl SubmissionDetector {
    pub fn new(keywords: &KeywordSets) -> Self {
        Self {
            phrases: keywords.submission_shared(),
        }
    }

    /// `true` if any interactive element carries a submission-intent phrase.
    pub fn detect(&self, html: &str) -> bool {
        self.first_match(html).is_some()
    }

    /// The first phrase found, scanning elements in document order.
    pub fn first_match(&self, html: &str) -> Option<&str> {
        if html.trim().is_empty() {
            return None;
        }
        let document = Html::parse_document(html);

        document.select(interactive_selector()).find_map(|el| {
            let text = element_text(&el);
            let value = input_value(&el).unwrap_or_default();
            self.phrases
                .iter()
                .find(|phrase| text.contains(phrase.as_str()) || value.contains(phrase.as_str()))
                .map(String::as_str)
        })
    }
}

impl Default for SubmissionDetector {
    fn default() -> Self {
        Self::new(KeywordSets::builtin())
    }
}

/// Lower-cased `value` attribute, read for `input` elements only.
fn input_value(el: &ElementRef<'_>) -> Option<String> {
    let element = el.value();
    if element.name() != "input" {
        return None;
    }
    element.attr("value").map(str::to_lowercase)
}

/// Lower-cased text content of an element.
fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().to_lowercase()
}
