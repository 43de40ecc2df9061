//! Ask command - one-shot question to the dataset assistant.

use std::path::Path;

use colored::Colorize;
use tunekit::AssistantAction;

use super::{CommandResult, load_config, open_session};
use crate::cli::SourceArgs;

pub fn run(
    source: SourceArgs,
    action: String,
    message: Option<String>,
    config: Option<&Path>,
    verbose: bool,
) -> CommandResult {
    let action: AssistantAction = action.parse()?;
    let config = load_config(config)?;
    let session = open_session(&source, &config, verbose)?;

    println!(
        "{} {} ({} items)",
        "Assistant".cyan().bold(),
        action.to_string().white(),
        session.selection().len()
    );
    println!();

    let reply = session
        .ask(action, message.as_deref())
        .map_err(|e| format!("{} {}", e, e.user_hint()))?;

    println!("{}", reply);
    Ok(())
}
