//! `deadline-scout search`: search, enrich and print results.

use anyhow::{bail, Result};

use crate::cli::output;
use crate::config::ScoutConfig;
use crate::query::SearchQuery;
use crate::scout::Scout;

/// Run the search command.
pub async fn run(config: &ScoutConfig, query: SearchQuery, save: bool) -> Result<()> {
    let scout = Scout::from_config(config)?;
    if !scout.has_search() {
        bail!("search is not configured. Set API_KEY and CX in the environment or config.env.");
    }

    let q = query.to_query_string();
    if q.is_empty() {
        bail!("empty query. Pass at least one of --text, --keyword1, --keyword2.");
    }

    let candidates = scout.search(&query).await?;
    let results = scout.enrich(&candidates, save).await;
    output::print_results(&results);
    Ok(())
}
