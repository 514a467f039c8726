//! Curated phrase sets that drive submission detection and date scanning.
//!
//! The built-in sets are embedded at compile time from `keywords.json` and
//! parsed once. Phrases are lower-cased on load because every scan runs
//! against lower-cased page text.

use crate::types::{ScoutError, ScoutResult};
use serde::Deserialize;
use std::sync::{Arc, OnceLock};

/// Raw JSON content of the phrase lists, embedded at compile time.
const KEYWORDS_JSON: &str = include_str!("keywords.json");

#[derive(Debug, Deserialize)]
struct RawKeywords {
    submission: Vec<String>,
    expiry: Vec<String>,
}

/// Immutable submission-intent and expiry-intent phrase sets.
///
/// Cloning is cheap: both sets are shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct KeywordSets {
    submission: Arc<[String]>,
    expiry: Arc<[String]>,
}

impl KeywordSets {
    /// Build a custom phrase configuration.
    ///
    /// Phrases are trimmed and lower-cased. An empty phrase would match every
    /// string, so it is rejected.
    pub fn new(submission: Vec<String>, expiry: Vec<String>) -> ScoutResult<Self> {
        Ok(Self {
            submission: normalize_phrases("submission", submission)?.into(),
            expiry: normalize_phrases("expiry", expiry)?.into(),
        })
    }

    /// The phrase sets shipped with the crate.
    pub fn builtin() -> &'static KeywordSets {
        static BUILTIN: OnceLock<KeywordSets> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            Self::from_json(KEYWORDS_JSON).unwrap_or_else(|e| {
                tracing::error!(error = %e, "built-in keyword sets are unusable, detection is disabled");
                KeywordSets {
                    submission: Arc::from(Vec::new()),
                    expiry: Arc::from(Vec::new()),
                }
            })
        })
    }

    /// Parse a `{"submission": [..], "expiry": [..]}` document.
    pub fn from_json(json: &str) -> ScoutResult<Self> {
        let raw: RawKeywords = serde_json::from_str(json)
            .map_err(|e| ScoutError::InvalidKeywords(format!("malformed keyword JSON: {e}")))?;
        Self::new(raw.submission, raw.expiry)
    }

    /// Phrases whose presence in a link, button or submit input signals a call-to-action.
    pub fn submission(&self) -> &[String] {
        &self.submission
    }

    /// Phrases whose presence in page text triggers a date scan.
    pub fn expiry(&self) -> &[String] {
        &self.expiry
    }

    pub(crate) fn submission_shared(&self) -> Arc<[String]> {
        Arc::clone(&self.submission)
    }

    pub(crate) fn expiry_shared(&self) -> Arc<[String]> {
        Arc::clone(&self.expiry)
    }
}

impl Default for KeywordSets {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

fn normalize_phrases(kind: &str, phrases: Vec<String>) -> ScoutResult<Vec<String>> {
    phrases
        .into_iter()
        .enumerate()
        .map(|(idx, phrase)| {
            let phrase = phrase.trim().to_lowercase();
            if phrase.is_empty() {
                Err(ScoutError::InvalidKeywords(format!(
                    "{kind} phrase #{idx} is empty"
                )))
            } else {
                Ok(phrase)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let sets = KeywordSets::from_json(r#"{"submission": ["Apply Now"], "expiry": ["closes"]}"#).unwrap();
        assert_eq!(sets.submission(), ["apply now".to_string()]);
        assert_eq!(sets.expiry(), ["closes".to_string()]);
    }

    #[test]
    fn test_from_json_rejects_bad_documents() {
        assert!(matches!(
            KeywordSets::from_json("{not json"),
            Err(ScoutError::InvalidKeywords(_))
        ));
        assert!(KeywordSets::from_json(r#"{"submission": ["ok"]}"#).is_err());
        assert!(KeywordSets::from_json(r#"{"submission": [" "], "expiry": []}"#).is_err());
    }

    #[test]
    fn test_builtin_sets_are_loaded() {
        let sets = KeywordSets::builtin();
        assert_eq!(sets.submission().len(), 76);
        assert_eq!(sets.expiry().len(), 57);
        assert!(sets.submission().iter().any(|p| p == "apply now"));
        assert!(sets.expiry().iter().any(|p| p == "deadline"));
    }

    #[test]
    fn test_builtin_phrases_are_lowercase() {
        let sets = KeywordSets::builtin();
        for phrase in sets.submission().iter().chain(sets.expiry()) {
            assert_eq!(phrase, &phrase.to_lowercase());
        }
        assert!(sets.expiry().iter().any(|p| p == "submission last date"));
    }

    #[test]
    fn test_custom_sets_are_normalized() {
        let sets = KeywordSets::new(
            vec!["  Apply Here ".to_string()],
            vec!["Closes On".to_string()],
        )
        .unwrap();
        assert_eq!(sets.submission(), ["apply here".to_string()]);
        assert_eq!(sets.expiry(), ["closes on".to_string()]);
    }

    #[test]
    fn test_empty_phrase_rejected() {
        let err = KeywordSets::new(vec!["apply".to_string(), "  ".to_string()], vec![])
            .unwrap_err();
        assert!(matches!(err, ScoutError::InvalidKeywords(msg) if msg.contains("#1")));
    }
}
