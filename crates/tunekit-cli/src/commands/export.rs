//! Export command - write the selection as a training dataset.

use std::path::{Path, PathBuf};

use colored::Colorize;
use tunekit::export::{self, resolve_selection};
use tunekit::{BatchRun, ExportFormat};

use super::{CommandResult, load_config, open_session};
use crate::cli::SourceArgs;

pub struct ExportArgs {
    pub format: Option<String>,
    pub name: Option<String>,
    pub out_dir: PathBuf,
    pub processed: Option<PathBuf>,
}

pub fn run(source: SourceArgs, args: ExportArgs, config: Option<&Path>, verbose: bool) -> CommandResult {
    let config = load_config(config)?;
    let session = open_session(&source, &config, verbose)?;

    let format = match args.format {
        Some(f) => f.parse::<ExportFormat>()?,
        None => session.export_defaults().format,
    };
    let name = args
        .name
        .unwrap_or_else(|| session.export_defaults().dataset_name.clone());

    // A saved run supplies cleaned content for the items it covers
    let run = match &args.processed {
        Some(path) => {
            let run = BatchRun::load(path)?;
            if verbose {
                println!(
                    "Loaded {} processed items from {}",
                    run.items.len(),
                    path.display()
                );
            }
            Some(run)
        }
        None => None,
    };

    let selected = session.selected();
    let items = resolve_selection(&selected, run.as_ref());
    let artifact = export::export(&items, format, &name)
        .map_err(|e| format!("{} {}", e, e.user_hint()))?;

    let cleaned = run
        .as_ref()
        .map(|r| selected.iter().filter(|i| r.get(i.id).is_some()).count())
        .unwrap_or(0);

    let path = artifact.write_to(&args.out_dir)?;

    println!(
        "{} {} records as {} ({})",
        "Exported".green().bold(),
        artifact.records.to_string().white().bold(),
        format.to_string().cyan(),
        format.description()
    );
    if run.is_some() {
        println!(
            "  {} cleaned, {} raw",
            cleaned.to_string().green(),
            (artifact.records - cleaned).to_string().yellow()
        );
    }
    println!(
        "{} {}",
        "Saved to".green().bold(),
        path.display().to_string().white()
    );

    Ok(())
}
