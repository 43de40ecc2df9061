//! Anthropic Claude API provider implementation.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::json;

use crate::assistant::AssistRequest;
use crate::classification::{Classification, ClassificationPayload};
use crate::error::{Result, TunekitError};

use super::error::ServiceError;
use super::prompts;
use super::provider::{
    ClassifyRequest, CleanRequest, CurationProvider, LlmConfig, parse_json_reply,
};

/// Anthropic API endpoint.
const API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Anthropic API version.
const API_VERSION: &str = "2023-06-01";

/// Anthropic Claude provider.
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    config: LlmConfig,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, LlmConfig::default())
    }

    /// Create a new Anthropic provider with custom configuration.
    pub fn with_config(api_key: impl Into<String>, config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TunekitError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Create from environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            TunekitError::Config("ANTHROPIC_API_KEY environment variable not set".to_string())
        })?;
        Self::new(api_key)
    }

    /// Build headers for API requests.
    fn build_headers(&self) -> std::result::Result<HeaderMap, ServiceError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| ServiceError::Unreachable(format!("Invalid API key: {}", e)))?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        Ok(headers)
    }

    /// Send a message to the Claude API and return the first text block.
    fn send_message(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> std::result::Result<String, ServiceError> {
        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "system": system_prompt,
            "messages": [
                {
                    "role": "user",
                    "content": user_prompt
                }
            ]
        });

        let response = self
            .client
            .post(self.config.base_url.as_deref().unwrap_or(API_URL))
            .headers(self.build_headers()?)
            .json(&body)
            .send()?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().unwrap_or_default();
            tracing::warn!(provider = "anthropic", status, "API error");
            return Err(ServiceError::from_status(status, &error_text));
        }

        let api_response: ApiResponse = response.json().map_err(|e| {
            ServiceError::MalformedResponse(format!("Failed to parse API response: {}", e))
        })?;

        Ok(first_text(api_response))
    }
}

impl CurationProvider for AnthropicProvider {
    fn classify(
        &self,
        request: &ClassifyRequest,
    ) -> std::result::Result<Classification, ServiceError> {
        let reply = self.send_message(
            prompts::classification_system_prompt(),
            &prompts::classification_prompt(request),
        )?;
        if reply.trim().is_empty() {
            return Err(ServiceError::MalformedResponse(
                "Could not classify content".to_string(),
            ));
        }
        let payload: ClassificationPayload = parse_json_reply(&reply)?;
        Ok(payload.into_classification())
    }

    fn clean(&self, request: &CleanRequest) -> std::result::Result<String, ServiceError> {
        self.send_message(
            &prompts::cleaning_system_prompt(request),
            &prompts::cleaning_prompt(request),
        )
    }

    fn assist(&self, request: &AssistRequest) -> std::result::Result<String, ServiceError> {
        let reply = self.send_message(
            prompts::assistant_system_prompt(),
            &prompts::assistant_prompt(request),
        )?;
        if reply.trim().is_empty() {
            return Err(ServiceError::MalformedResponse(
                "No response from AI".to_string(),
            ));
        }
        Ok(reply)
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

/// First text block of the reply; empty when only non-text blocks came back.
fn first_text(response: ApiResponse) -> String {
    response
        .content
        .into_iter()
        .find(|block| block.content_type == "text")
        .map(|block| block.text)
        .unwrap_or_default()
}

/// Anthropic API response structure.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}
