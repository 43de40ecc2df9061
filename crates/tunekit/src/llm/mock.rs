//! Mock provider for tests and offline runs.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::json;

use crate::assistant::{AssistRequest, AssistantAction};
use crate::catalog::ItemKind;
use crate::classification::{Classification, Complexity};

use super::error::ServiceError;
use super::provider::{ClassifyRequest, CleanRequest, CurationProvider, LlmConfig};

/// Scripted outcome for one cleaning call.
#[derive(Debug, Clone)]
enum CleanScript {
    Reply(String),
    Fail(ServiceError),
}

#[derive(Debug, Default)]
struct Scripts {
    clean: HashMap<String, CleanScript>,
    classify_failure: Option<ServiceError>,
    assist_failure: Option<ServiceError>,
    calls: Vec<String>,
}

/// Mock provider that returns predictable responses.
///
/// Cleaning outcomes can be scripted per item title; every call is logged
/// so tests can check ordering and early termination.
pub struct MockProvider {
    config: LlmConfig,
    scripts: Mutex<Scripts>,
}

impl MockProvider {
    /// Create a new mock provider.
    pub fn new() -> Self {
        Self::with_config(LlmConfig {
            model: "mock".to_string(),
            ..LlmConfig::default()
        })
    }

    /// Create with custom configuration.
    pub fn with_config(config: LlmConfig) -> Self {
        Self {
            config,
            scripts: Mutex::new(Scripts::default()),
        }
    }

    fn scripts(&self) -> std::sync::MutexGuard<'_, Scripts> {
        self.scripts.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Return `reply` verbatim when cleaning the item titled `title`.
    pub fn with_clean_reply(self, title: impl Into<String>, reply: impl Into<String>) -> Self {
        self.scripts()
            .clean
            .insert(title.into(), CleanScript::Reply(reply.into()));
        self
    }

    /// Return a structured cleaning result with the given score for `title`.
    pub fn with_clean_score(self, title: impl Into<String>, score: u8) -> Self {
        let title = title.into();
        let reply = json!({
            "cleanedContent": format!("cleaned: {}", title),
            "changes": ["Scored by mock"],
            "qualityScore": score,
        })
        .to_string();
        self.with_clean_reply(title, reply)
    }

    /// Fail the cleaning call for the item titled `title`.
    pub fn with_clean_failure(self, title: impl Into<String>, error: ServiceError) -> Self {
        self.scripts()
            .clean
            .insert(title.into(), CleanScript::Fail(error));
        self
    }

    /// Fail every classification call.
    pub fn with_classify_failure(self, error: ServiceError) -> Self {
        self.scripts().classify_failure = Some(error);
        self
    }

    /// Fail every assistant call.
    pub fn with_assist_failure(self, error: ServiceError) -> Self {
        self.scripts().assist_failure = Some(error);
        self
    }

    /// Calls made so far, as `"<kind>:<title or type>"`.
    pub fn calls(&self) -> Vec<String> {
        self.scripts().calls.clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CurationProvider for MockProvider {
    fn classify(&self, request: &ClassifyRequest) -> Result<Classification, ServiceError> {
        let mut scripts = self.scripts();
        scripts.calls.push(format!("classify:{}", request.kind));
        if let Some(err) = scripts.classify_failure.clone() {
            return Err(err);
        }

        let summary: String = request
            .content
            .lines()
            .next()
            .unwrap_or_default()
            .chars()
            .take(60)
            .collect();

        let classification = match request.kind {
            ItemKind::Code => Classification::new("utility", 70, summary)
                .with_tags(vec!["code".to_string(), "snippet".to_string()]),
            ItemKind::Prompt => Classification::new("explanation", 80, summary)
                .with_tags(vec!["prompt".to_string(), "instruction".to_string()])
                .with_domain("general")
                .with_complexity(Complexity::Moderate),
        };
        Ok(classification)
    }

    fn clean(&self, request: &CleanRequest) -> Result<String, ServiceError> {
        let mut scripts = self.scripts();
        scripts.calls.push(format!("clean:{}", request.title));

        match scripts.clean.get(&request.title) {
            Some(CleanScript::Reply(reply)) => Ok(reply.clone()),
            Some(CleanScript::Fail(err)) => Err(err.clone()),
            None => Ok(json!({
                "cleanedContent": request.content.trim(),
                "changes": ["Trimmed surrounding whitespace"],
                "qualityScore": 85,
            })
            .to_string()),
        }
    }

    fn assist(&self, request: &AssistRequest) -> Result<String, ServiceError> {
        let mut scripts = self.scripts();
        scripts.calls.push(format!("assist:{}", request.action));
        if let Some(err) = scripts.assist_failure.clone() {
            return Err(err);
        }

        let reply = match request.action {
            AssistantAction::Analyze => format!(
                "## Dataset analysis\n\n{} items reviewed. No blocking issues found.",
                request.items.len()
            ),
            AssistantAction::SuggestImprovements => {
                "## Suggestions\n\n- Add more context to short prompts.".to_string()
            }
            AssistantAction::GeneratePairs => {
                "## New pairs\n\n1. **User:** Explain recursion.\n   **Assistant:** ...".to_string()
            }
            AssistantAction::Chat => format!(
                "You asked: {}",
                request.user_message.as_deref().unwrap_or_default()
            ),
        };
        Ok(reply)
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "mock"
    }
}
