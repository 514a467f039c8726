//! The search → enrich → store pipeline shared by the REST server and the CLI.

use anyhow::{anyhow, Context, Result};
use deadline_scout::{CandidateLink, EnrichedResult, Enricher, HttpFetcher, KeywordSets};
use std::sync::{Arc, Mutex};

use crate::config::ScoutConfig;
use crate::query::SearchQuery;
use crate::search::{GoogleSearchClient, SearchProvider};
use crate::store::{ResultStore, StoredRow};

/// Pipeline wiring: optional search provider, enricher, optional store.
pub struct Scout {
    enricher: Enricher,
    search: Option<Arc<dyn SearchProvider>>,
    store: Option<Arc<Mutex<ResultStore>>>,
}

impl Scout {
    pub fn new(
        enricher: Enricher,
        search: Option<Arc<dyn SearchProvider>>,
        store: Option<ResultStore>,
    ) -> Self {
        Self {
            enricher,
            search,
            store: store.map(|s| Arc::new(Mutex::new(s))),
        }
    }

    /// Wire everything from configuration.
    pub fn from_config(config: &ScoutConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.fetch_options()).context("failed to build page fetcher")?;
        let enricher = Enricher::new(
            Arc::new(fetcher),
            KeywordSets::builtin(),
            config.enrich_options(),
        );

        let search: Option<Arc<dyn SearchProvider>> = match config.search_credentials() {
            Some((key, cx)) => Some(Arc::new(GoogleSearchClient::new(key, cx, &config.date_restrict)?)),
            None => {
                tracing::warn!("API_KEY/CX not set; search is disabled");
                None
            }
        };

        let store = match &config.store_path {
            Some(path) => {
                tracing::info!("Result store: {}", path.display());
                Some(ResultStore::open(path)?)
            }
            None => None,
        };

        Ok(Self::new(enricher, search, store))
    }

    pub fn has_search(&self) -> bool {
        self.search.is_some()
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// Run the search step only.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<CandidateLink>> {
        let provider = self
            .search
            .as_ref()
            .ok_or_else(|| anyhow!("search is not configured (set API_KEY and CX)"))?;
        let q = query.to_query_string();
        tracing::info!(query = %q, "searching");
        provider.search(&q).await
    }

    /// Search, enrich, and persist. Search failures yield an empty list.
    pub async fn search_and_enrich(&self, query: &SearchQuery) -> Vec<EnrichedResult> {
        let candidates = match self.search(query).await {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "search failed");
                Vec::new()
            }
        };
        self.enrich(&candidates, true).await
    }

    /// Enrich candidates, optionally persisting the results.
    ///
    /// Persistence problems are logged; the results are returned regardless.
    pub async fn enrich(&self, candidates: &[CandidateLink], persist: bool) -> Vec<EnrichedResult> {
        let results = self.enricher.enrich(candidates).await;
        if persist && !results.is_empty() {
            if let Err(e) = self.persist(&results).await {
                tracing::warn!(error = %format!("{e:#}"), "failed to store results");
            }
        }
        results
    }

    /// Write results to the store. A no-op returning 0 without a store.
    pub async fn persist(&self, results: &[EnrichedResult]) -> Result<usize> {
        let Some(store) = self.store.clone() else {
            return Ok(0);
        };
        let rows = results.to_vec();
        tokio::task::spawn_blocking(move || {
            let mut store = store.lock().map_err(|_| anyhow!("result store lock poisoned"))?;
            store.append(&rows)
        })
        .await
        .context("store task failed")?
    }

    /// Most recent stored rows; empty without a store.
    pub async fn stored_rows(&self, limit: usize) -> Result<Vec<StoredRow>> {
        let Some(store) = self.store.clone() else {
            return Ok(Vec::new());
        };
        tokio::task::spawn_blocking(move || {
            let store = store.lock().map_err(|_| anyhow!("result store lock poisoned"))?;
            store.rows(limit)
        })
        .await
        .context("store task failed")?
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    const PAGE: &str = "<body><p>Apply by 1st June 2024</p>\n<button>Apply Now</button></body>";

    #[tokio::test]
    async fn test_search_and_enrich_persists() {
        let scout = scout(
            Some(StubSearch {
                links: vec![
                    CandidateLink::new("Fellowship", "https://f.example"),
                    CandidateLink::new("Dead link", "https://gone.example"),
                ],
                fail: false,
            }),
            &[("https://f.example", PAGE)],
            true,
        );

        let results = scout.search_and_enrich(&SearchQuery::default()).await;
        assert_eq!(results.len(), 2);
        assert!(results[0].has_submission_links);
        assert_eq!(results[0].expiry_dates, vec!["2024-06-01"]);
        assert_eq!(results[1], EnrichedResult::empty(&CandidateLink::new("Dead link", "https://gone.example")));

        let rows = scout.stored_rows(10).await.unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_search_failure_yields_empty() {
        let scout = scout(Some(StubSearch { links: vec![], fail: true }), &[], true);
        assert!(scout.search_and_enrich(&SearchQuery::default()).await.is_empty());
        assert!(scout.stored_rows(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_unconfigured() {
        let scout = scout(None, &[], false);
        assert!(!scout.has_search());
        let err = scout.search(&SearchQuery::default()).await.unwrap_err();
        assert!(err.to_string().contains("API_KEY"));
    }

    #[tokio::test]
    async fn test_enrich_without_store() {
        let scout = scout(None, &[("https://f.example", PAGE)], false);
        let results = scout
            .enrich(&[CandidateLink::new("F", "https://f.example")], true)
            .await;
        assert_eq!(results.len(), 1);
        assert_eq!(scout.persist(&results).await.unwrap(), 0);
        assert!(scout.stored_rows(5).await.unwrap().is_empty());
    }
}
