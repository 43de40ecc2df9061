//! CLI command implementations.

pub mod ask;
pub mod classify;
pub mod clean;
pub mod export;
pub mod serve;
pub mod stats;

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use tunekit::llm::LlmConfig;
use tunekit::{
    AnthropicProvider, Catalog, CurationProvider, CurationSession, MockProvider, OpenAIProvider,
    StudioConfig,
};

use crate::cli::{LlmProviderChoice, SourceArgs};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Read the config file if one was given, defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<StudioConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(StudioConfig::load(path)?),
        None => Ok(StudioConfig::default()),
    }
}

/// Build the provider named on the command line.
///
/// `--model` wins over the config file. OpenAI keeps its own default model
/// unless one of them names another.
pub fn build_provider(
    choice: &LlmProviderChoice,
    model: Option<&str>,
    config: &LlmConfig,
) -> Result<Arc<dyn CurationProvider>, Box<dyn std::error::Error>> {
    let mut llm = config.clone();
    let configured_model = llm.model != LlmConfig::default().model;
    if let Some(model) = model {
        llm.model = model.to_string();
    }

    let provider: Arc<dyn CurationProvider> = match choice {
        LlmProviderChoice::Mock => Arc::new(MockProvider::new()),
        LlmProviderChoice::OpenAI => {
            let api_key = std::env::var("OPENAI_API_KEY")
                .map_err(|_| "OPENAI_API_KEY environment variable not set")?;
            if model.is_none() && !configured_model {
                llm.model = "gpt-4o".to_string();
            }
            if llm.base_url.is_none() {
                llm.base_url = std::env::var("TUNEKIT_BASE_URL").ok();
            }
            Arc::new(OpenAIProvider::with_config(api_key, llm)?)
        }
        LlmProviderChoice::Anthropic => {
            let api_key = std::env::var("ANTHROPIC_API_KEY")
                .map_err(|_| "ANTHROPIC_API_KEY environment variable not set")?;
            Arc::new(AnthropicProvider::with_config(api_key, llm)?)
        }
    };

    tracing::debug!(provider = provider.name(), "provider ready");
    Ok(provider)
}

pub fn load_catalog(source: &SourceArgs) -> Result<Catalog, Box<dyn std::error::Error>> {
    if source.demo {
        return Ok(Catalog::demo());
    }
    match &source.catalog {
        Some(path) => {
            if !path.exists() {
                return Err(format!("File not found: {}", path.display()).into());
            }
            Ok(Catalog::load(path)?)
        }
        None => Err("No catalog given. Pass a catalog file or --demo.".into()),
    }
}

/// Build a session and apply `--ids` / `--all` to its selection.
pub fn open_session(
    source: &SourceArgs,
    config: &StudioConfig,
    verbose: bool,
) -> Result<CurationSession, Box<dyn std::error::Error>> {
    let catalog = load_catalog(source)?;
    let provider = build_provider(&source.llm, source.model.as_deref(), &config.llm)?;
    let session = CurationSession::with_config(catalog, provider, config);

    if source.all {
        session.select_all();
    } else {
        for id in &source.ids {
            session.select(*id)?;
        }
    }

    if verbose {
        println!(
            "{} {} of {} items ({} via {})",
            "Selected".cyan(),
            session.selection().len().to_string().white().bold(),
            session.catalog().len(),
            session.selection().total_tokens(),
            session.provider_name()
        );
    }

    Ok(session)
}
