//! Classify command - attach AI-generated metadata to selected items.

use std::path::Path;

use colored::Colorize;

use super::{CommandResult, load_config, open_session};
use crate::cli::SourceArgs;

pub fn run(source: SourceArgs, json_output: bool, config: Option<&Path>, verbose: bool) -> CommandResult {
    let config = load_config(config)?;
    let session = open_session(&source, &config, verbose)?;
    let selected = session.selected();
    if selected.is_empty() {
        return Err("No items selected. Use --ids or --all.".into());
    }

    let mut results = Vec::new();
    let mut failures = 0;

    for item in &selected {
        match session.classify(item.id) {
            Ok(classification) => {
                if !json_output {
                    println!(
                        "{} {} {}",
                        format!("[{}]", item.id).dimmed(),
                        item.title.white().bold(),
                        format!("{}%", classification.quality_score).green()
                    );
                    println!("    {} {}", "Category:".yellow(), classification.category);
                    if !classification.tags.is_empty() {
                        println!("    {} {}", "Tags:".yellow(), classification.tags.join(", "));
                    }
                    if !classification.summary.is_empty() {
                        println!("    {}", classification.summary.dimmed());
                    }
                }
                results.push(serde_json::json!({
                    "id": item.id,
                    "classification": classification,
                }));
            }
            Err(e) => {
                failures += 1;
                eprintln!(
                    "{} {} {}: {} {}",
                    "Failed".red().bold(),
                    format!("[{}]", item.id).dimmed(),
                    item.title,
                    e,
                    e.user_hint().dimmed()
                );
                results.push(serde_json::json!({
                    "id": item.id,
                    "error": e.to_string(),
                }));
            }
        }
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        println!();
        println!(
            "Classified {} of {} items",
            (selected.len() - failures).to_string().white().bold(),
            selected.len()
        );
    }

    if failures == selected.len() {
        return Err("Classification failed for every selected item".into());
    }
    Ok(())
}
