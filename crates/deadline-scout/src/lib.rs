//! Deadline Scout: enrich search results with submission calls-to-action and deadline dates.

pub mod dates;
pub mod enrich;
pub mod fetcher;
pub mod keywords;
pub mod submission;
pub mod types;

pub use dates::{normalize_date, DateExtractor, ScanMode};
pub use enrich::{EnrichOptions, Enricher};
pub use fetcher::{FetchOptions, HttpFetcher, PageSource};
pub use keywords::KeywordSets;
pub use submission::SubmissionDetector;
pub use types::*;
