//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Tunekit: curate captured AI artifacts into fine-tuning datasets
#[derive(Parser)]
#[command(name = "tunekit")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a TOML config file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Where the items come from and which of them are selected.
#[derive(Args, Clone, Debug)]
pub struct SourceArgs {
    /// Catalog file (JSON array or JSON Lines of captured items)
    #[arg(value_name = "CATALOG", required_unless_present = "demo")]
    pub catalog: Option<PathBuf>,

    /// Use the built-in demo catalog
    #[arg(long, conflicts_with = "catalog")]
    pub demo: bool,

    /// Comma-separated item ids to select, in order
    #[arg(long, value_delimiter = ',', conflicts_with = "all")]
    pub ids: Vec<u64>,

    /// Select every catalog item
    #[arg(long)]
    pub all: bool,

    /// LLM provider to use
    #[arg(long, default_value = "mock")]
    pub llm: LlmProviderChoice,

    /// Model to use (provider-specific, e.g., "gpt-4o", "claude-sonnet-4-20250514")
    #[arg(long)]
    pub model: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify selected items and show the generated metadata
    Classify {
        #[command(flatten)]
        source: SourceArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Batch-clean the selection through the language model
    Clean {
        #[command(flatten)]
        source: SourceArgs,

        /// Write the batch run as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not ask the model to drop duplicates
        #[arg(long)]
        keep_duplicates: bool,

        /// Do not ask the model to mask personal data
        #[arg(long)]
        no_mask_pii: bool,

        /// Ask the model to keep code only
        #[arg(long)]
        code_only: bool,

        /// Minimum token count hint
        #[arg(long, default_value = "50")]
        min_tokens: u32,
    },

    /// Export the selection as a training dataset
    Export {
        #[command(flatten)]
        source: SourceArgs,

        /// Output format (jsonl, alpaca, sharegpt)
        #[arg(short, long)]
        format: Option<String>,

        /// Dataset name, used as the file stem
        #[arg(short, long)]
        name: Option<String>,

        /// Directory to write the dataset into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Batch run file written by `tunekit clean --output`
        #[arg(long)]
        processed: Option<PathBuf>,
    },

    /// Show token, quality and source statistics for the selection
    Stats {
        #[command(flatten)]
        source: SourceArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask the dataset assistant about the selection
    Ask {
        #[command(flatten)]
        source: SourceArgs,

        /// Action (analyze, suggest-improvements, generate-pairs, chat)
        #[arg(short, long, default_value = "chat")]
        action: String,

        /// Message for the chat action
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Serve the curation API over HTTP
    Serve {
        #[command(flatten)]
        source: SourceArgs,

        /// Port for web server
        #[arg(short, long, default_value = "3141")]
        port: u16,
    },
}

/// LLM provider choice
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LlmProviderChoice {
    /// Deterministic offline provider
    #[default]
    Mock,
    /// OpenAI or a compatible gateway (requires OPENAI_API_KEY)
    OpenAI,
    /// Anthropic Claude API (requires ANTHROPIC_API_KEY)
    Anthropic,
}

impl std::str::FromStr for LlmProviderChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" | "test" | "offline" => Ok(LlmProviderChoice::Mock),
            "openai" | "gpt" | "gateway" => Ok(LlmProviderChoice::OpenAI),
            "anthropic" | "claude" => Ok(LlmProviderChoice::Anthropic),
            _ => Err(format!(
                "Unknown provider: {}. Use: mock, openai, or anthropic.",
                s
            )),
        }
    }
}

impl std::fmt::Display for LlmProviderChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProviderChoice::Mock => write!(f, "mock"),
            LlmProviderChoice::OpenAI => write!(f, "openai"),
            LlmProviderChoice::Anthropic => write!(f, "anthropic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_provider_choice_aliases() {
        assert_eq!("GPT".parse::<LlmProviderChoice>(), Ok(LlmProviderChoice::OpenAI));
        assert_eq!("claude".parse::<LlmProviderChoice>(), Ok(LlmProviderChoice::Anthropic));
        assert!("llama".parse::<LlmProviderChoice>().is_err());
    }

    #[test]
    fn test_ids_are_comma_separated() {
        let cli = Cli::parse_from(["tunekit", "stats", "--demo", "--ids", "3,1,2"]);
        match cli.command {
            Commands::Stats { source, .. } => {
                assert!(source.demo);
                assert_eq!(source.ids, vec![3, 1, 2]);
                assert_eq!(source.llm, LlmProviderChoice::Mock);
            }
            _ => panic!("expected stats"),
        }
    }
}
