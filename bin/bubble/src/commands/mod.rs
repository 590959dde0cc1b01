pub mod classify;
pub mod config_cmd;
pub mod flows;
pub mod history;
pub mod status;
pub mod suggest;
pub mod watch;

use bubble_companion::SuggestionEngine;
use bubble_core::{CapturedItem, Config, Suggestion};

pub(crate) fn build_engine(config: &Config) -> anyhow::Result<SuggestionEngine> {
    let client = bubble_providers::create_client(config)?;
    Ok(SuggestionEngine::new(client))
}

pub(crate) fn print_item(item: &CapturedItem) {
    println!(
        "[{}] {} ({}, from {})",
        item.captured_at.format("%H:%M:%S"),
        item.classification.as_deref().unwrap_or("Analyzing content..."),
        item.kind,
        item.source_label.as_deref().unwrap_or("unknown"),
    );
    for line in item.content.lines() {
        println!("    {}", line);
    }
}

pub(crate) fn print_suggestions(suggestions: &[Suggestion]) {
    if suggestions.is_empty() {
        println!("  (no suggestions)");
        return;
    }
    for (i, s) in suggestions.iter().enumerate() {
        println!("  {}. {} - {}", i + 1, s.action, s.description);
    }
}
