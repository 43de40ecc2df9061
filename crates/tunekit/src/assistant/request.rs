//! Assistant actions and the request sent to the capability.

use serde::{Deserialize, Serialize};

use crate::catalog::{DataItem, ItemKind};

/// What the assistant is asked to do with the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssistantAction {
    /// Overall quality assessment of the dataset.
    Analyze,
    /// Concrete fixes for individual items.
    SuggestImprovements,
    /// New instruction/response pairs complementing the dataset.
    GeneratePairs,
    /// Free-form question from the user.
    Chat,
}

impl AssistantAction {
    /// Only chat carries a user message.
    pub fn requires_message(&self) -> bool {
        matches!(self, AssistantAction::Chat)
    }
}

impl std::str::FromStr for AssistantAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "analyze" => Ok(AssistantAction::Analyze),
            "suggest-improvements" | "suggest" => Ok(AssistantAction::SuggestImprovements),
            "generate-pairs" | "generate" => Ok(AssistantAction::GeneratePairs),
            "chat" => Ok(AssistantAction::Chat),
            _ => Err(format!(
                "Unknown action: {}. Use analyze, suggest-improvements, generate-pairs, or chat.",
                s
            )),
        }
    }
}

impl std::fmt::Display for AssistantAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssistantAction::Analyze => write!(f, "analyze"),
            AssistantAction::SuggestImprovements => write!(f, "suggest-improvements"),
            AssistantAction::GeneratePairs => write!(f, "generate-pairs"),
            AssistantAction::Chat => write!(f, "chat"),
        }
    }
}

/// The slice of an item the assistant sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantItem {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub title: String,
    pub content: String,
    pub tokens: u32,
}

impl From<&DataItem> for AssistantItem {
    fn from(item: &DataItem) -> Self {
        Self {
            id: item.id,
            kind: item.kind,
            title: item.title.clone(),
            content: item.content.clone(),
            tokens: item.token_count,
        }
    }
}

/// Request for one assistant reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistRequest {
    pub items: Vec<AssistantItem>,
    pub action: AssistantAction,
    #[serde(
        rename = "userMessage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub user_message: Option<String>,
}

impl AssistRequest {
    pub fn new(
        items: Vec<AssistantItem>,
        action: AssistantAction,
        user_message: Option<String>,
    ) -> Self {
        Self {
            items,
            action,
            user_message,
        }
    }
}
