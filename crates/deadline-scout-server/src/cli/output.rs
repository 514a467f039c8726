//! Shared terminal output helpers.

use deadline_scout::EnrichedResult;
use std::sync::atomic::{AtomicBool, Ordering};

static PLAIN_OUTPUT: AtomicBool = AtomicBool::new(false);

/// Switch every command from pretty JSON to a human-readable listing.
pub fn set_plain(enabled: bool) {
    PLAIN_OUTPUT.store(enabled, Ordering::Relaxed);
}

pub fn is_plain() -> bool {
    PLAIN_OUTPUT.load(Ordering::Relaxed)
}

pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("  Error: failed to encode JSON output: {e}"),
    }
}

/// One human-readable line per result.
pub fn format_result(result: &EnrichedResult) -> String {
    let marker = if result.has_submission_links { "[submit]" } else { "        " };
    let dates = if result.expiry_dates.is_empty() {
        "-".to_string()
    } else {
        result.expiry_dates_joined()
    };
    format!("{marker} {}\n         {}\n         expires: {dates}", result.title, result.link)
}

/// Print results as pretty JSON, or as a readable list in plain mode.
pub fn print_results(results: &[EnrichedResult]) {
    if !is_plain() {
        print_json(results);
        return;
    }
    if results.is_empty() {
        println!("No results.");
        return;
    }
    for result in results {
        println!("{}", format_result(result));
    }
    let with_links = results.iter().filter(|r| r.has_submission_links).count();
    println!("\n{} results, {with_links} with submission links", results.len());
}
