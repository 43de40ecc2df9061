//! Serve command - expose the curation session over HTTP.

use std::path::Path;

use colored::Colorize;

use super::{CommandResult, load_config, open_session};
use crate::cli::SourceArgs;
use crate::server::{app, state::AppState};

pub fn run(source: SourceArgs, port: u16, config: Option<&Path>, verbose: bool) -> CommandResult {
    let config = load_config(config)?;
    let session = open_session(&source, &config, verbose)?;

    let state = AppState::new(session);
    let url = format!("http://localhost:{}/api", port);

    println!();
    println!(
        "{} {}",
        "Starting curation API at".cyan().bold(),
        url.white().bold()
    );
    println!();
    println!("  Catalog:  {} items", state.session.catalog().len());
    println!("  Selected: {} items", state.session.selection().len());
    println!("  Provider: {}", state.session.provider_name());
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        tokio::select! {
            result = app::run_server(state, port) => {
                if let Err(e) = result {
                    eprintln!("Server error: {}", e);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                println!("{}", "Shutting down...".yellow());
            }
        }
    });

    Ok(())
}
