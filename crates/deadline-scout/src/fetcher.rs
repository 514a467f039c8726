//! Page fetching over HTTP.
//!
//! Target pages live on third-party sites we do not control, so certificate
//! validation is switched off. Transport errors and 5xx responses are retried
//! with exponential backoff, 429 honours a bounded `Retry-After`.

use crate::types::{ScoutError, ScoutResult};
use async_trait::async_trait;
use std::time::Duration;

/// Something that can produce raw markup for a URL.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the page body. Any failure means "no content" to the caller.
    async fn fetch(&self, url: &str) -> ScoutResult<String>;
}

/// Tuning for [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Per-request timeout.
    pub timeout_ms: u64,
    /// Retries after the first attempt on transport errors, 5xx and 429.
    pub max_retries: u32,
    /// Base delay for exponential backoff.
    pub retry_base_ms: u64,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 15_000,
            max_retries: 2,
            retry_base_ms: 500,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                         AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/131.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

/// HTTP page source backed by `reqwest`.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    options: FetchOptions,
}

impl HttpFetcher {
    pub fn new(options: FetchOptions) -> ScoutResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(options.timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(options.user_agent.as_str())
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(ScoutError::ClientBuild)?;

        Ok(Self { client, options })
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(self.options.retry_base_ms.saturating_mul(factor))
    }

    async fn get_with_retry(&self, url: &str) -> ScoutResult<String> {
        let mut retries = 0u32;

        loop {
            let resp = self
                .client
                .get(url)
                .timeout(Duration::from_millis(self.options.timeout_ms))
                .send()
                .await;

            match resp {
                Ok(r) => {
                    let status = r.status();

                    if status.is_server_error() && retries < self.options.max_retries {
                        retries += 1;
                        tracing::debug!(url, status = status.as_u16(), retries, "retrying after server error");
                        tokio::time::sleep(self.backoff(retries)).await;
                        continue;
                    }

                    if status.as_u16() == 429 && retries < self.options.max_retries {
                        retries += 1;
                        let retry_after = r
                            .headers()
                            .get(reqwest::header::RETRY_AFTER)
                            .and_then(|v| v.to_str().ok())
                            .and_then(|s| s.parse::<u64>().ok())
                            .map(Duration::from_secs)
                            .unwrap_or_else(|| self.backoff(retries));
                        tokio::time::sleep(retry_after.min(Duration::from_secs(10))).await;
                        continue;
                    }

                    if !status.is_success() {
                        return Err(ScoutError::Status {
                            url: url.to_string(),
                            status: status.as_u16(),
                        });
                    }

                    let body = r.text().await?;
                    if body.trim().is_empty() {
                        return Err(ScoutError::EmptyBody(url.to_string()));
                    }
                    return Ok(body);
                }
                // Malformed URLs and similar request-building errors never succeed on retry.
                Err(e) if e.is_builder() => return Err(e.into()),
                Err(e) => {
                    if retries < self.options.max_retries {
                        retries += 1;
                        tracing::debug!(url, error = %e, retries, "retrying after transport error");
                        tokio::time::sleep(self.backoff(retries)).await;
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn fetch(&self, url: &str) -> ScoutResult<String> {
        self.get_with_retry(url).await
    }
}
