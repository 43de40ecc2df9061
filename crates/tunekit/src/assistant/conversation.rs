//! Chat history scoped to the current selection.

use serde::{Deserialize, Serialize};

use crate::catalog::DataItem;
use crate::error::{Result, TunekitError};

use super::request::{AssistRequest, AssistantAction, AssistantItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingReply,
}

/// Request/response exchange with the assistant.
///
/// An exchange is split into [`begin`](Conversation::begin) and
/// [`complete`](Conversation::complete) / [`fail`](Conversation::fail) so the
/// caller can release any lock around the conversation while the capability
/// answers. At most one exchange is open at a time.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    state: ConversationState,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    /// Validate an action against the selection and open an exchange.
    ///
    /// A chat message is appended to the history before anything is sent.
    pub fn begin(
        &mut self,
        selection: &[DataItem],
        action: AssistantAction,
        message: Option<&str>,
    ) -> Result<AssistRequest> {
        if self.state == ConversationState::AwaitingReply {
            return Err(TunekitError::InvalidRequest(
                "The assistant is still answering".to_string(),
            ));
        }

        let user_message = if action.requires_message() {
            let text = message.map(str::trim).unwrap_or_default();
            if text.is_empty() {
                return Err(TunekitError::InvalidRequest(
                    "Chat requires a non-empty message".to_string(),
                ));
            }
            Some(text.to_string())
        } else {
            if selection.is_empty() {
                return Err(TunekitError::NoData("No items selected".to_string()));
            }
            None
        };

        if let Some(text) = &user_message {
            self.messages.push(ChatMessage {
                role: ChatRole::User,
                content: text.clone(),
            });
        }
        self.state = ConversationState::AwaitingReply;

        let items = selection.iter().map(AssistantItem::from).collect();
        Ok(AssistRequest::new(items, action, user_message))
    }

    /// Close the open exchange with the assistant's reply.
    pub fn complete(&mut self, reply: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: ChatRole::Assistant,
            content: reply.into(),
        });
        self.state = ConversationState::Idle;
    }

    /// Close the open exchange without a reply.
    pub fn fail(&mut self) {
        self.state = ConversationState::Idle;
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.state = ConversationState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ItemKind;

    fn selection() -> Vec<DataItem> {
        vec![DataItem::new(1, ItemKind::Prompt, "t", "c")]
    }

    #[test]
    fn test_non_chat_action_needs_selection() {
        let mut conversation = Conversation::new();
        let result = conversation.begin(&[], AssistantAction::Analyze, None);

        assert!(matches!(result, Err(TunekitError::NoData(_))));
        assert!(conversation.messages().is_empty());
        assert_eq!(conversation.state(), ConversationState::Idle);
    }

    #[test]
    fn test_chat_rejects_blank_message() {
        let mut conversation = Conversation::new();
        let result = conversation.begin(&selection(), AssistantAction::Chat, Some("   "));
        assert!(matches!(result, Err(TunekitError::InvalidRequest(_))));
    }

    #[test]
    fn test_chat_allowed_without_selection() {
        let mut conversation = Conversation::new();
        let request = conversation
            .begin(&[], AssistantAction::Chat, Some("  hello "))
            .unwrap();
        assert_eq!(request.user_message.as_deref(), Some("hello"));
        conversation.complete("hi");

        assert_eq!(conversation.messages().len(), 2);
        assert_eq!(conversation.messages()[0].role, ChatRole::User);
        assert_eq!(conversation.messages()[1].role, ChatRole::Assistant);
    }

    #[test]
    fn test_quick_action_appends_only_reply() {
        let mut conversation = Conversation::new();
        conversation
            .begin(&selection(), AssistantAction::Analyze, Some("ignored"))
            .unwrap();
        conversation.complete("analysis");

        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].role, ChatRole::Assistant);
    }

    #[test]
    fn test_failure_keeps_user_message_and_returns_to_idle() {
        let mut conversation = Conversation::new();
        conversation
            .begin(&selection(), AssistantAction::Chat, Some("q"))
            .unwrap();
        conversation.fail();

        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].role, ChatRole::User);
        assert_eq!(conversation.state(), ConversationState::Idle);
    }

    #[test]
    fn test_second_exchange_rejected_while_awaiting() {
        let mut conversation = Conversation::new();
        conversation
            .begin(&selection(), AssistantAction::Analyze, None)
            .unwrap();

        let second = conversation.begin(&selection(), AssistantAction::Analyze, None);
        assert!(matches!(second, Err(TunekitError::InvalidRequest(_))));

        conversation.complete("done");
        assert_eq!(conversation.state(), ConversationState::Idle);
    }
}
