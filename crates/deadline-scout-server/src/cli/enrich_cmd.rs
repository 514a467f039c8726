//! `deadline-scout enrich`: enrich explicit URLs or a candidates file.

use anyhow::{bail, Context, Result};
use deadline_scout::CandidateLink;
use std::path::Path;

use crate::cli::output;
use crate::config::ScoutConfig;
use crate::scout::Scout;

/// Run the enrich command.
pub async fn run(
    config: &ScoutConfig,
    urls: &[String],
    file: Option<&Path>,
    save: bool,
) -> Result<()> {
    let mut candidates: Vec<CandidateLink> = urls
        .iter()
        .map(|u| CandidateLink::new(u.as_str(), u.as_str()))
        .collect();
    if let Some(path) = file {
        candidates.extend(load_candidates(path)?);
    }
    if candidates.is_empty() {
        bail!("nothing to enrich. Pass URLs or --file candidates.json.");
    }

    let scout = Scout::from_config(config)?;
    let results = scout.enrich(&candidates, save).await;
    output::print_results(&results);
    Ok(())
}

/// Read a JSON array of `{"title", "url"}` objects.
pub fn load_candidates(path: &Path) -> Result<Vec<CandidateLink>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of {{title, url}} objects", path.display()))
}
