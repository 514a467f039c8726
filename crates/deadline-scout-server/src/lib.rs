//! Deadline Scout server: search, enrich and store results behind a REST API
//! and a command-line interface.

pub mod cli;
pub mod config;
pub mod query;
pub mod rest;
pub mod scout;
pub mod search;
pub mod store;

pub use config::ScoutConfig;
pub use query::{build_query, SearchQuery};
pub use scout::Scout;
pub use search::{GoogleSearchClient, SearchProvider};
pub use store::{ResultStore, StoredRow};
