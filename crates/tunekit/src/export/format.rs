//! Training-data wire formats.

use serde::{Deserialize, Serialize};

/// Output representation of an exported dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Chat fine-tuning records, one JSON object per line.
    #[default]
    Jsonl,
    /// Instruction/input/output records.
    Alpaca,
    /// Multi-turn conversation records.
    #[serde(rename = "sharegpt")]
    ShareGpt,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [
        ExportFormat::Jsonl,
        ExportFormat::Alpaca,
        ExportFormat::ShareGpt,
    ];

    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Jsonl => "jsonl",
            ExportFormat::Alpaca | ExportFormat::ShareGpt => "json",
        }
    }

    /// MIME type used when the artifact is served over HTTP.
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Jsonl => "application/jsonl",
            ExportFormat::Alpaca | ExportFormat::ShareGpt => "application/json",
        }
    }

    /// Short description shown next to the format name.
    pub fn description(&self) -> &'static str {
        match self {
            ExportFormat::Jsonl => "OpenAI/Claude chat format",
            ExportFormat::Alpaca => "Instruction-following format",
            ExportFormat::ShareGpt => "Multi-turn conversations",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" | "chat" => Ok(ExportFormat::Jsonl),
            "alpaca" => Ok(ExportFormat::Alpaca),
            "sharegpt" | "share-gpt" => Ok(ExportFormat::ShareGpt),
            _ => Err(format!("Unknown format: {}. Use jsonl, alpaca, or sharegpt.", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Jsonl => write!(f, "jsonl"),
            ExportFormat::Alpaca => write!(f, "alpaca"),
            ExportFormat::ShareGpt => write!(f, "sharegpt"),
        }
    }
}
