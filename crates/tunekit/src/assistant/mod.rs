//! Conversational assistant over the current selection.

mod conversation;
mod request;

pub use conversation::{ChatMessage, ChatRole, Conversation, ConversationState};
pub use request::{AssistRequest, AssistantAction, AssistantItem};
