//! Clean command - run the batch cleaning engine over the selection.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use colored::Colorize;
use tunekit::CleaningOptions;

use super::{CommandResult, load_config, open_session};
use crate::cli::SourceArgs;

pub struct CleanArgs {
    pub output: Option<PathBuf>,
    pub options: CleaningOptions,
}

pub fn run(source: SourceArgs, args: CleanArgs, config: Option<&Path>, verbose: bool) -> CommandResult {
    let config = load_config(config)?;
    let session = open_session(&source, &config, verbose)?;

    println!(
        "{} {} items via {}",
        "Cleaning".cyan().bold(),
        session.selection().len().to_string().white(),
        session.provider_name()
    );

    let progress = session.progress_handle();
    let outcome = thread::scope(|s| {
        let worker = s.spawn(|| session.run_batch(&args.options));
        while !worker.is_finished() {
            if verbose {
                eprint!("\r  Progress: {:>3}%", progress.percent());
            }
            thread::sleep(Duration::from_millis(100));
        }
        if verbose {
            eprintln!("\r  Progress: {:>3}%", progress.percent());
        }
        worker.join()
    });
    let run = match outcome {
        Ok(result) => result.map_err(|e| format!("{} {}", e, e.user_hint()))?,
        Err(_) => return Err("Batch worker panicked".into()),
    };

    println!();
    for processed in &run.items {
        let score = processed.quality_score;
        let score_text = format!("{:>3}%", score);
        let score_text = if score >= 80 {
            score_text.green()
        } else if score >= 60 {
            score_text.yellow()
        } else {
            score_text.red()
        };
        println!(
            "  {} {} {}",
            score_text,
            format!("[{}]", processed.id()).dimmed(),
            processed.item.title.white()
        );
        if verbose {
            for change in &processed.changes {
                println!("        - {}", change.dimmed());
            }
        }
    }

    println!();
    println!(
        "Processed {} of {} items, average quality {}",
        run.summary.processed.to_string().white().bold(),
        run.summary.total,
        format!("{}%", run.summary.avg_quality_score).green().bold()
    );

    if let Some(path) = args.output {
        run.save(&path)?;
        println!(
            "{} {}",
            "Saved to".green().bold(),
            path.display().to_string().white()
        );
        println!(
            "Run {} to export the cleaned dataset",
            format!("tunekit export --processed {}", path.display()).cyan()
        );
    }

    Ok(())
}
