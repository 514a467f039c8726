//! Core data types for candidate links and enriched results.

use serde::{Deserialize, Serialize};

/// A search hit handed to the enrichment pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateLink {
    pub title: String,
    pub url: String,
}

impl CandidateLink {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Outcome of enriching one [`CandidateLink`].
///
/// Serialized field names (`title`, `link`, `hasSubmissionLinks`,
/// `expiryDates`) are the contract with downstream consumers and must not
/// change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedResult {
    pub title: String,
    pub link: String,
    pub has_submission_links: bool,
    /// Canonical `YYYY-MM-DD` dates in first-seen order.
    pub expiry_dates: Vec<String>,
}

impl EnrichedResult {
    /// Negative record for a candidate whose page yielded nothing.
    pub fn empty(candidate: &CandidateLink) -> Self {
        Self {
            title: candidate.title.clone(),
            link: candidate.url.clone(),
            has_submission_links: false,
            expiry_dates: Vec::new(),
        }
    }

    /// Expiry dates as a single `", "`-separated cell, as written to tabular sinks.
    pub fn expiry_dates_joined(&self) -> String {
        self.expiry_dates.join(", ")
    }
}

/// Errors that can occur in the enrichment library.
#[derive(thiserror::Error, Debug)]
pub enum ScoutError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP client setup failed: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Empty response body from {0}")]
    EmptyBody(String),

    #[error("Invalid keyword configuration: {0}")]
    InvalidKeywords(String),
}

/// Convenience result type.
pub type ScoutResult<T> = Result<T, ScoutError>;
