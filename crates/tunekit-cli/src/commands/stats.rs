//! Stats command - summarize the selection.

use std::path::Path;

use colored::Colorize;
use tunekit::stats::Bucket;

use super::{CommandResult, load_config, open_session};
use crate::cli::SourceArgs;

pub fn run(source: SourceArgs, json_output: bool, config: Option<&Path>, verbose: bool) -> CommandResult {
    let config = load_config(config)?;
    let session = open_session(&source, &config, verbose)?;
    let stats = session.stats();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Selection".cyan().bold());
    println!(
        "  Items:  {} ({} code, {} prompts)",
        stats.total_items.to_string().white().bold(),
        stats.code_count,
        stats.prompt_count
    );
    println!(
        "  Tokens: {} (avg {})",
        stats.total_tokens.to_string().white().bold(),
        stats.avg_tokens
    );
    match stats.avg_quality {
        Some(q) => println!(
            "  Quality: {} ({} scored, {} unscored)",
            format!("{}%", q).green().bold(),
            stats.scored,
            stats.unscored
        ),
        None => println!("  Quality: {}", "not scored yet".dimmed()),
    }

    print_buckets("Quality distribution:", &stats.quality_distribution);
    print_buckets("Token distribution:", &stats.token_distribution);
    print_buckets("Languages:", &stats.language_distribution);
    print_buckets("Sources:", &stats.source_distribution);

    Ok(())
}

fn print_buckets(heading: &str, buckets: &[Bucket]) {
    let max = buckets.iter().map(|b| b.count).max().unwrap_or(0);
    if max == 0 {
        return;
    }

    println!();
    println!("{}", heading.yellow().bold());
    let bar_width = 20;
    for bucket in buckets {
        let filled = (bucket.count * bar_width).div_ceil(max);
        let bar: String = "█".repeat(filled) + &"░".repeat(bar_width - filled);
        println!("  {:12} {} {}", bucket.label, bar.cyan(), bucket.count);
    }
}
