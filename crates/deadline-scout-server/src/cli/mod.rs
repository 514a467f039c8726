//! CLI subcommand implementations for the `deadline-scout` binary.

pub mod enrich_cmd;
pub mod output;
pub mod results_cmd;
pub mod search_cmd;
pub mod serve;
