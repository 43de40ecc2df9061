//! Dataset assistant handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tunekit::{AssistantAction, Conversation};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Request body for an assistant call.
#[derive(Deserialize)]
pub struct AskRequest {
    pub action: AssistantAction,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct AskResponse {
    pub reply: String,
    pub conversation: Conversation,
}

/// POST /api/assistant
pub async fn ask_assistant(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let session = state.session.clone();
    let reply =
        tokio::task::spawn_blocking(move || session.ask(req.action, req.message.as_deref()))
            .await??;

    Ok(Json(AskResponse {
        reply,
        conversation: state.session.conversation(),
    }))
}

/// GET /api/assistant
pub async fn get_conversation(State(state): State<AppState>) -> Json<Conversation> {
    Json(state.session.conversation())
}

/// DELETE /api/assistant
pub async fn clear_conversation(State(state): State<AppState>) -> Json<Conversation> {
    state.session.clear_conversation();
    Json(state.session.conversation())
}
