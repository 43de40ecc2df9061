//! Captured artifacts awaiting curation.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Kind of captured artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A code snippet.
    Code,
    /// A prompt sent to a model.
    Prompt,
}

impl ItemKind {
    /// Wire name used in requests to the model capability.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Code => "code",
            ItemKind::Prompt => "prompt",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable captured artifact.
///
/// Serialized field names follow the capture format (`type`, `lang`, `time`,
/// `tokens`, `hash`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataItem {
    /// Stable catalog key.
    pub id: u64,

    /// Code or prompt.
    #[serde(rename = "type")]
    pub kind: ItemKind,

    /// Short title, used as the user turn on export.
    pub title: String,

    /// Full captured text.
    pub content: String,

    /// Free-text language label (e.g. "PYTHON", "PROMPT").
    #[serde(rename = "lang", default)]
    pub language: String,

    /// Display-relative capture time (e.g. "2 mins ago").
    #[serde(rename = "time", default)]
    pub captured_at: String,

    /// Originating tool or model.
    #[serde(default)]
    pub source: String,

    /// Approximate token count.
    #[serde(rename = "tokens", default)]
    pub token_count: u32,

    /// Opaque fingerprint, display only.
    #[serde(rename = "hash", default)]
    pub content_hash: String,
}

impl DataItem {
    /// Create an item with the required fields; the rest are empty.
    pub fn new(
        id: u64,
        kind: ItemKind,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            kind,
            title: title.into(),
            content: content.into(),
            language: String::new(),
            captured_at: String::new(),
            source: String::new(),
            token_count: 0,
            content_hash: String::new(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_captured_at(mut self, captured_at: impl Into<String>) -> Self {
        self.captured_at = captured_at.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_tokens(mut self, tokens: u32) -> Self {
        self.token_count = tokens;
        self
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.content_hash = hash.into();
        self
    }

    /// SHA-256 fingerprint of the content.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.content.as_bytes());
        format!("sha256:{:x}", hasher.finalize())
    }

    /// Rough token estimate (four characters per token) for items captured
    /// without a count.
    pub fn estimate_tokens(&self) -> u32 {
        let chars = self.content.chars().count();
        chars.div_ceil(4).try_into().unwrap_or(u32::MAX)
    }
}
