//! Enrichment orchestration.
//!
//! Every candidate is fetched, then its markup is handed to the submission
//! detector and the date extractor. Candidates are independent: a failure on
//! one yields an empty record for that candidate and never touches the rest.
//! Fetches run concurrently up to a fixed cap, and the output keeps the input
//! order no matter which fetch finishes first.

use crate::dates::{DateExtractor, ScanMode};
use crate::fetcher::PageSource;
use crate::keywords::KeywordSets;
use crate::submission::SubmissionDetector;
use crate::types::{CandidateLink, EnrichedResult};
use futures::stream::{self, StreamExt};
use std::sync::Arc;

/// Tuning for [`Enricher`].
#[derive(Debug, Clone)]
pub struct EnrichOptions {
    /// Maximum number of fetches in flight at once.
    pub concurrency: usize,
    pub scan_mode: ScanMode,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            concurrency: 8,
            scan_mode: ScanMode::PerKeyword,
        }
    }
}

/// Turns candidate links into enriched results.
#[derive(Clone)]
pub struct Enricher {
    source: Arc<dyn PageSource>,
    detector: Arc<SubmissionDetector>,
    extractor: Arc<DateExtractor>,
    concurrency: usize,
}

impl Enricher {
    pub fn new(source: Arc<dyn PageSource>, keywords: &KeywordSets, options: EnrichOptions) -> Self {
        Self {
            source,
            detector: Arc::new(SubmissionDetector::new(keywords)),
            extractor: Arc::new(DateExtractor::new(keywords, options.scan_mode)),
            concurrency: options.concurrency.max(1),
        }
    }

    /// Enricher over the built-in keyword sets.
    pub fn with_defaults(source: Arc<dyn PageSource>) -> Self {
        Self::new(source, KeywordSets::builtin(), EnrichOptions::default())
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Enrich all candidates; one result per candidate, in input order.
    pub async fn enrich(&self, candidates: &[CandidateLink]) -> Vec<EnrichedResult> {
        tracing::info!(
            candidates = candidates.len(),
            concurrency = self.concurrency,
            "enriching candidates"
        );

        let results: Vec<EnrichedResult> = stream::iter(candidates.iter().cloned())
            .map(|candidate| {
                let enricher = self.clone();
                async move { enricher.enrich_one(&candidate).await }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let with_submission = results.iter().filter(|r| r.has_submission_links).count();
        let with_dates = results.iter().filter(|r| !r.expiry_dates.is_empty()).count();
        tracing::info!(
            results = results.len(),
            with_submission,
            with_dates,
            "enrichment finished"
        );

        results
    }

    /// Enrich a single candidate. Never fails: problems produce the empty record.
    pub async fn enrich_one(&self, candidate: &CandidateLink) -> EnrichedResult {
        let html = match self.source.fetch(&candidate.url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(url = %candidate.url, error = %e, "fetch failed, recording empty result");
                return EnrichedResult::empty(candidate);
            }
        };

        let detector = Arc::clone(&self.detector);
        let extractor = Arc::clone(&self.extractor);
        // HTML parsing is CPU-bound and scraper documents are !Send.
        let analysis = tokio::task::spawn_blocking(move || {
            (detector.detect(&html), extractor.extract(&html))
        })
        .await;

        match analysis {
            Ok((has_submission_links, expiry_dates)) => {
                tracing::debug!(
                    url = %candidate.url,
                    has_submission_links,
                    dates = expiry_dates.len(),
                    "page analysed"
                );
                EnrichedResult {
                    title: candidate.title.clone(),
                    link: candidate.url.clone(),
                    has_submission_links,
                    expiry_dates,
                }
            }
            Err(e) => {
                tracing::warn!(url = %candidate.url, error = %e, "page analysis aborted");
                EnrichedResult::empty(candidate)
            }
        }
    }
}
