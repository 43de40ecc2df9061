//! Studio configuration loaded from TOML.
//!
//! ```toml
//! [llm]
//! model = "gpt-4o-mini"
//! base_url = "https://gateway.example.com/v1/chat/completions"
//!
//! [batch]
//! inter_item_delay_ms = 250
//!
//! [export]
//! dataset_name = "MyDataset-v2"
//! format = "sharegpt"
//! ```
//!
//! Every section and field is optional. API keys are never read from the
//! file; providers take them from the environment.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cleaning::BatchConfig;
use crate::error::{Result, TunekitError};
use crate::export::ExportFormat;
use crate::llm::LlmConfig;

/// Defaults for the export step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub dataset_name: String,
    pub format: ExportFormat,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dataset_name: "PlayArts-Finetune-v1".to_string(),
            format: ExportFormat::Jsonl,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub llm: LlmConfig,
    pub batch: BatchConfig,
    pub export: ExportConfig,
}

impl StudioConfig {
    /// Read a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| TunekitError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::from_toml(&text)
            .map_err(|e| TunekitError::Config(format!("{}: {}", path.display(), e)))?;
        config
            .batch
            .validate()
            .map_err(|e| TunekitError::Config(format!("{}: [batch] {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
