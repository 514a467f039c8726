//! `deadline-scout results`: show recently stored results.

use anyhow::{bail, Result};

use crate::cli::output;
use crate::config::ScoutConfig;
use crate::store::ResultStore;

/// Run the results command.
pub fn run(config: &ScoutConfig, limit: usize) -> Result<()> {
    let Some(path) = &config.store_path else {
        bail!("the result store is disabled (SCOUT_STORE=off).");
    };
    if !path.exists() {
        if !output::is_plain() {
            output::print_json(&serde_json::json!([]));
        } else {
            println!("No results stored yet at {}.", path.display());
        }
        return Ok(());
    }

    let store = ResultStore::open(path)?;
    let rows = store.rows(limit)?;

    if !output::is_plain() {
        output::print_json(&rows);
        return Ok(());
    }
    for row in &rows {
        let marker = if row.has_submission_links { "[submit]" } else { "        " };
        println!("{marker} {} ({})", row.title, row.recorded_at);
        println!("         {}", row.link);
        if !row.expiry_dates.is_empty() {
            println!("         expires: {}", row.expiry_dates);
        }
    }
    println!("\n{} of {} stored results", rows.len(), store.count()?);
    Ok(())
}
