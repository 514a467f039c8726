//! Configuration loading and resolution.
//!
//! Values come from the process environment, after `config.env` and `.env`
//! have been loaded when present. Command-line flags override them later.

use anyhow::{Context, Result};
use deadline_scout::{EnrichOptions, FetchOptions, ScanMode};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_CONCURRENCY: usize = 8;
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_DATE_RESTRICT: &str = "d6";

/// Runtime configuration for the server and CLI.
#[derive(Debug, Clone)]
pub struct ScoutConfig {
    /// Search API key; search is unavailable without it.
    pub api_key: Option<String>,
    /// Custom search engine id.
    pub cx: Option<String>,
    pub port: u16,
    pub concurrency: usize,
    pub fetch_timeout_ms: u64,
    /// Recency window passed to the search API (e.g. `d6`).
    pub date_restrict: String,
    /// Result store location; `None` disables persistence.
    pub store_path: Option<PathBuf>,
    pub dedup_dates: bool,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            cx: None,
            port: DEFAULT_PORT,
            concurrency: DEFAULT_CONCURRENCY,
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            date_restrict: DEFAULT_DATE_RESTRICT.to_string(),
            store_path: resolve_store_path(None),
            dedup_dates: false,
        }
    }
}

impl ScoutConfig {
    /// Load configuration from env files and environment variables.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::from_filename("config.env");
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            api_key: non_empty("API_KEY"),
            cx: non_empty("CX"),
            port: non_empty("PORT")
                .map(|v| v.trim().parse::<u16>())
                .transpose()
                .context("PORT must be a valid port number")?
                .unwrap_or(DEFAULT_PORT),
            concurrency: non_empty("SCOUT_CONCURRENCY")
                .map(|v| v.trim().parse::<usize>())
                .transpose()
                .context("SCOUT_CONCURRENCY must be a positive integer")?
                .unwrap_or(DEFAULT_CONCURRENCY),
            fetch_timeout_ms: non_empty("SCOUT_FETCH_TIMEOUT_MS")
                .map(|v| v.trim().parse::<u64>())
                .transpose()
                .context("SCOUT_FETCH_TIMEOUT_MS must be a number of milliseconds")?
                .unwrap_or(DEFAULT_FETCH_TIMEOUT_MS),
            date_restrict: non_empty("SCOUT_DATE_RESTRICT")
                .unwrap_or_else(|| DEFAULT_DATE_RESTRICT.to_string()),
            store_path: resolve_store_path(non_empty("SCOUT_STORE").as_deref()),
            dedup_dates: non_empty("SCOUT_DEDUP_DATES")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        })
    }

    /// Search credentials, when both are configured.
    pub fn search_credentials(&self) -> Option<(&str, &str)> {
        match (&self.api_key, &self.cx) {
            (Some(key), Some(cx)) => Some((key.as_str(), cx.as_str())),
            _ => None,
        }
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout_ms: self.fetch_timeout_ms,
            ..FetchOptions::default()
        }
    }

    pub fn enrich_options(&self) -> EnrichOptions {
        EnrichOptions {
            concurrency: self.concurrency.max(1),
            scan_mode: if self.dedup_dates {
                ScanMode::Deduplicated
            } else {
                ScanMode::PerKeyword
            },
        }
    }
}

/// Resolve the result store path.
///
/// `off` (any case) disables persistence; anything else is a path. Without a
/// value the store lives under the home directory.
pub fn resolve_store_path(explicit: Option<&str>) -> Option<PathBuf> {
    match explicit.map(str::trim) {
        Some(v) if v.eq_ignore_ascii_case("off") => None,
        Some(v) if !v.is_empty() => Some(PathBuf::from(v)),
        _ => Some(default_store_path()),
    }
}

fn default_store_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".deadline-scout")
        .join("results.db")
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ScoutConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.date_restrict, "d6");
        assert!(config.search_credentials().is_none());
        assert!(!config.dedup_dates);
        assert!(config
            .store_path
            .as_ref()
            .is_some_and(|p| p.ends_with(".deadline-scout/results.db")));
    }

    #[test]
    fn test_values_from_lookup() {
        let config = ScoutConfig::from_lookup(lookup(&[
            ("API_KEY", "key-123"),
            ("CX", "engine-9"),
            ("PORT", "8080"),
            ("SCOUT_CONCURRENCY", "2"),
            ("SCOUT_FETCH_TIMEOUT_MS", "500"),
            ("SCOUT_DATE_RESTRICT", "m3"),
            ("SCOUT_STORE", "/tmp/scout.db"),
            ("SCOUT_DEDUP_DATES", "true"),
        ]))
        .unwrap();

        assert_eq!(config.search_credentials(), Some(("key-123", "engine-9")));
        assert_eq!(config.port, 8080);
        assert_eq!(config.fetch_options().timeout_ms, 500);
        assert_eq!(config.enrich_options().concurrency, 2);
        assert_eq!(config.enrich_options().scan_mode, ScanMode::Deduplicated);
        assert_eq!(config.date_restrict, "m3");
        assert_eq!(config.store_path, Some(PathBuf::from("/tmp/scout.db")));
    }

    #[test]
    fn test_invalid_port_is_error() {
        let err = ScoutConfig::from_lookup(lookup(&[("PORT", "not-a-port")])).unwrap_err();
        assert!(format!("{err:#}").contains("PORT"));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = ScoutConfig::from_lookup(lookup(&[("API_KEY", "  "), ("CX", "x")])).unwrap();
        assert!(config.api_key.is_none());
        assert!(config.search_credentials().is_none());
    }

    #[test]
    fn test_store_can_be_disabled() {
        assert_eq!(resolve_store_path(Some("OFF")), None);
        assert_eq!(
            resolve_store_path(Some("results.db")),
            Some(PathBuf::from("results.db"))
        );
    }
}
