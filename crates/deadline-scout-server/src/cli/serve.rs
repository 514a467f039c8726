//! `deadline-scout serve`: run the REST API.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::ScoutConfig;
use crate::rest;
use crate::scout::Scout;

/// Run the serve command.
pub async fn run(config: &ScoutConfig) -> Result<()> {
    let scout = Scout::from_config(config)?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(
        concurrency = config.concurrency,
        search = scout.has_search(),
        store = scout.has_store(),
        "deadline-scout starting"
    );
    rest::start(addr, Arc::new(scout)).await
}
