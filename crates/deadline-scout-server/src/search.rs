//! Web search providers that turn a query string into candidate links.

use anyhow::{Context, Result};
use async_trait::async_trait;
use deadline_scout::CandidateLink;
use serde::Deserialize;
use std::time::Duration;

pub const GOOGLE_CUSTOM_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Anything that can answer a query with `(title, url)` pairs.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<CandidateLink>>;
}

/// Google Custom Search JSON API client.
pub struct GoogleSearchClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    cx: String,
    date_restrict: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    link: String,
}

impl GoogleSearchClient {
    pub fn new(api_key: &str, cx: &str, date_restrict: &str) -> Result<Self> {
        Self::with_endpoint(GOOGLE_CUSTOM_SEARCH_ENDPOINT, api_key, cx, date_restrict)
    }

    /// Client against a non-default endpoint (used for local testing).
    pub fn with_endpoint(endpoint: &str, api_key: &str, cx: &str, date_restrict: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            cx: cx.to_string(),
            date_restrict: date_restrict.to_string(),
        })
    }
}

#[async_trait]
impl SearchProvider for GoogleSearchClient {
    async fn search(&self, query: &str) -> Result<Vec<CandidateLink>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("key", self.api_key.as_str()),
                ("cx", self.cx.as_str()),
                ("dateRestrict", self.date_restrict.as_str()),
            ])
            .send()
            .await
            .context("Failed to send search request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Search API error {}: {}", status, body);
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .context("Failed to parse search response")?;

        let links: Vec<CandidateLink> = parsed
            .items
            .into_iter()
            .map(|item| CandidateLink::new(item.title, item.link))
            .collect();
        tracing::info!(query, results = links.len(), "search completed");

        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GoogleSearchClient {
        GoogleSearchClient::with_endpoint(
            &format!("{}/customsearch/v1", server.uri()),
            "test-key",
            "test-cx",
            "d6",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_maps_items_to_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .and(query_param("q", "call for papers -paid"))
            .and(query_param("key", "test-key"))
            .and(query_param("cx", "test-cx"))
            .and(query_param("dateRestrict", "d6"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "kind": "customsearch#search",
                "items": [
                    {"title": "ICML 2024 CFP", "link": "https://icml.example/cfp", "snippet": "..."},
                    {"title": "Workshop", "link": "https://ws.example/"}
                ]
            })))
            .mount(&server)
            .await;

        let links = client_for(&server)
            .search("call for papers -paid")
            .await
            .unwrap();
        assert_eq!(
            links,
            vec![
                CandidateLink::new("ICML 2024 CFP", "https://icml.example/cfp"),
                CandidateLink::new("Workshop", "https://ws.example/"),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_items_means_no_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "kind": "customsearch#search",
                "searchInformation": {"totalResults": "0"}
            })))
            .mount(&server)
            .await;

        let links = client_for(&server).search("nothing").await.unwrap();
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_api_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let err = client_for(&server).search("x").await.unwrap_err();
        assert!(err.to_string().contains("403"));
    }
}
