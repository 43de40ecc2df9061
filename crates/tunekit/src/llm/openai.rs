//! OpenAI-compatible chat-completions provider.
//!
//! Works against the OpenAI API or any gateway that speaks the same
//! protocol (set `LlmConfig::base_url`).

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::assistant::AssistRequest;
use crate::classification::{Classification, ClassificationPayload};
use crate::error::{Result, TunekitError};

use super::error::ServiceError;
use super::prompts;
use super::provider::{
    ClassifyRequest, CleanRequest, CurationProvider, LlmConfig, parse_json_reply,
};

/// OpenAI API endpoint.
const API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Name of the forced classification tool.
const CLASSIFY_TOOL: &str = "classify_content";

/// OpenAI GPT provider.
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    config: LlmConfig,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let config = LlmConfig {
            model: "gpt-4o".to_string(),
            ..LlmConfig::default()
        };
        Self::with_config(api_key, config)
    }

    /// Create a new OpenAI provider with custom configuration.
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

    /// Create from environment variables.
    ///
    /// Reads `OPENAI_API_KEY` and, if set, `TUNEKIT_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            TunekitError::Config("OPENAI_API_KEY environment variable not set".to_string())
        })?;
        let mut provider = Self::new(api_key)?;
        if let Ok(url) = std::env::var("TUNEKIT_BASE_URL") {
            provider.config.base_url = Some(url);
        }
        Ok(provider)
    }

    fn endpoint(&self) -> &str {
        self.config.base_url.as_deref().unwrap_or(API_URL)
    }

    /// Build headers for API requests.
    fn build_headers(&self) -> std::result::Result<HeaderMap, ServiceError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| ServiceError::Unreachable(format!("Invalid API key: {}", e)))?,
        );
        Ok(headers)
    }

    /// Send a chat completion and return the first choice's message.
    fn send_chat(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        tools: Option<Value>,
    ) -> std::result::Result<ChatMessage, ServiceError> {
        let mut body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt }
            ]
        });
        if let Some(tools) = tools {
            body["tools"] = tools;
            body["tool_choice"] = json!({ "type": "function", "function": { "name": CLASSIFY_TOOL } });
        }

        let response = self
            .client
            .post(self.endpoint())
            .headers(self.build_headers()?)
            .json(&body)
            .send()?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().unwrap_or_default();
            tracing::warn!(provider = "openai", status, "API error");
            return Err(ServiceError::from_status(status, &error_text));
        }

        let api_response: ChatResponse = response.json().map_err(|e| {
            ServiceError::MalformedResponse(format!("Failed to parse API response: {}", e))
        })?;

        first_message(api_response)
    }
}

impl CurationProvider for OpenAIProvider {
    fn classify(
        &self,
        request: &ClassifyRequest,
    ) -> std::result::Result<Classification, ServiceError> {
        let message = self.send_chat(
            prompts::classification_system_prompt(),
            &prompts::classification_prompt(request),
            Some(classification_tool()),
        )?;
        classification_from_message(&message)
    }

    fn clean(&self, request: &CleanRequest) -> std::result::Result<String, ServiceError> {
        let message = self.send_chat(
            &prompts::cleaning_system_prompt(request),
            &prompts::cleaning_prompt(request),
            None,
        )?;
        Ok(message.content.unwrap_or_default())
    }

    fn assist(&self, request: &AssistRequest) -> std::result::Result<String, ServiceError> {
        let message = self.send_chat(
            prompts::assistant_system_prompt(),
            &prompts::assistant_prompt(request),
            None,
        )?;
        message
            .content
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ServiceError::MalformedResponse("No response from AI".to_string()))
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Function tool forcing a structured classification.
fn classification_tool() -> Value {
    json!([{
        "type": "function",
        "function": {
            "name": CLASSIFY_TOOL,
            "description": "Classify and tag the content for AI training datasets",
            "parameters": {
                "type": "object",
                "properties": {
                    "category": { "type": "string", "description": "Primary category of the content" },
                    "language": { "type": "string", "description": "Programming language if code, or 'prompt' for prompts" },
                    "domain": { "type": "string", "description": "Domain or subject area" },
                    "complexity": { "type": "string", "enum": ["simple", "moderate", "complex"] },
                    "qualityScore": { "type": "number", "description": "Quality score from 1-10" },
                    "tags": { "type": "array", "items": { "type": "string" }, "description": "2-5 relevant tags" },
                    "summary": { "type": "string", "description": "One-line summary of the content" }
                },
                "required": ["category", "qualityScore", "tags", "summary"]
            }
        }
    }])
}

fn first_message(response: ChatResponse) -> std::result::Result<ChatMessage, ServiceError> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| ServiceError::MalformedResponse("No choices in API response".to_string()))
}

/// Prefer the tool call arguments, fall back to JSON in the message text.
fn classification_from_message(
    message: &ChatMessage,
) -> std::result::Result<Classification, ServiceError> {
    let arguments = message
        .tool_calls
        .iter()
        .flatten()
        .find(|call| call.function.name == CLASSIFY_TOOL)
        .map(|call| call.function.arguments.as_str());

    let payload: ClassificationPayload = match (arguments, message.content.as_deref()) {
        (Some(args), _) => serde_json::from_str(args).map_err(|e| {
            ServiceError::MalformedResponse(format!("Invalid tool arguments: {}", e))
        })?,
        (None, Some(text)) if !text.trim().is_empty() => parse_json_reply(text)?,
        _ => {
            return Err(ServiceError::MalformedResponse(
                "Could not classify content".to_string(),
            ));
        }
    };

    Ok(payload.into_classification())
}

/// OpenAI API response structure.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    name: String,
    arguments: String,
}
