//! Provider trait and request types.

use serde::{Deserialize, Serialize};

use crate::assistant::AssistRequest;
use crate::catalog::{DataItem, ItemKind};
use crate::classification::Classification;
use crate::cleaning::CleaningOptions;

use super::error::ServiceError;

/// Request for classifying one artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub content: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
}

impl ClassifyRequest {
    pub fn from_item(item: &DataItem) -> Self {
        Self {
            content: item.content.clone(),
            kind: item.kind,
        }
    }
}

/// Request for cleaning one artifact during a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanRequest {
    pub content: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub options: CleaningOptions,
}

impl CleanRequest {
    pub fn from_item(item: &DataItem, options: &CleaningOptions) -> Self {
        Self {
            content: item.content.clone(),
            title: item.title.clone(),
            kind: item.kind,
            options: options.clone(),
        }
    }
}

/// Configuration for LLM providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model to use (e.g., "gpt-4o", "claude-sonnet-4-20250514").
    pub model: String,

    /// Maximum tokens in response.
    pub max_tokens: usize,

    /// Temperature for generation (0.0-1.0).
    pub temperature: f64,

    /// Full endpoint URL replacing the provider's default (e.g. an
    /// OpenAI-compatible gateway's `/v1/chat/completions`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 4096,
            temperature: 0.3,
            base_url: None,
            timeout_secs: 60,
        }
    }
}

/// The external model capability.
///
/// Implementations must be thread-safe (Send + Sync) so a single provider
/// can be shared by the session, the batch engine and the HTTP handlers.
/// All calls block until the capability answers or the transport times out.
pub trait CurationProvider: Send + Sync {
    /// Produce a structured classification for one artifact.
    ///
    /// Returns [`ServiceError::MalformedResponse`] when the reply does not
    /// fit the classification schema.
    fn classify(&self, request: &ClassifyRequest) -> Result<Classification, ServiceError>;

    /// Ask the capability to clean one artifact and return its raw reply.
    ///
    /// Interpreting the reply (structured or free text) is left to the
    /// batch engine.
    fn clean(&self, request: &CleanRequest) -> Result<String, ServiceError>;

    /// Free-form assistant reply about the current selection.
    fn assist(&self, request: &AssistRequest) -> Result<String, ServiceError>;

    /// Get the configuration for this provider.
    fn config(&self) -> &LlmConfig;

    /// Get the name of this provider (for logging/debugging).
    fn name(&self) -> &str;
}

/// Parse JSON from an LLM reply, handling markdown code blocks.
pub(crate) fn parse_json_reply<T: for<'de> Deserialize<'de>>(
    reply: &str,
) -> Result<T, ServiceError> {
    let json_str = if reply.contains("```json") {
        reply
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .map(|s| s.trim())
            .unwrap_or(reply)
    } else if reply.contains("```") {
        reply
            .split("```")
            .nth(1)
            .map(|s| s.trim())
            .unwrap_or(reply)
    } else {
        reply.trim()
    };

    serde_json::from_str(json_str).map_err(|e| {
        ServiceError::MalformedResponse(format!("Failed to parse LLM JSON response: {}", e))
    })
}
