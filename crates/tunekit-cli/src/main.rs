//! Tunekit CLI - dataset curation for captured AI artifacts.

mod cli;
mod commands;
mod server;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use tunekit::CleaningOptions;

/// Log to stderr so command output stays pipeable.
fn init_logging(verbose: bool) {
    let default = if verbose { "tunekit=debug,tunekit_cli=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Classify { source, json } => {
            commands::classify::run(source, json, config, cli.verbose)
        }

        Commands::Clean {
            source,
            output,
            keep_duplicates,
            no_mask_pii,
            code_only,
            min_tokens,
        } => {
            let args = commands::clean::CleanArgs {
                output,
                options: CleaningOptions {
                    remove_duplicates: !keep_duplicates,
                    mask_pii: !no_mask_pii,
                    code_only,
                    min_tokens,
                },
            };
            commands::clean::run(source, args, config, cli.verbose)
        }

        Commands::Export {
            source,
            format,
            name,
            out_dir,
            processed,
        } => {
            let args = commands::export::ExportArgs {
                format,
                name,
                out_dir,
                processed,
            };
            commands::export::run(source, args, config, cli.verbose)
        }

        Commands::Stats { source, json } => commands::stats::run(source, json, config, cli.verbose),

        Commands::Ask {
            source,
            action,
            message,
        } => commands::ask::run(source, action, message, config, cli.verbose),

        Commands::Serve { source, port } => {
            commands::serve::run(source, port, config, cli.verbose)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
