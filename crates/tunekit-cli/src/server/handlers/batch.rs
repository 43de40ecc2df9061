//! Batch cleaning handlers.

use axum::{Json, extract::State};
use serde::Serialize;
use tunekit::{BatchRun, CleaningOptions};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Latest run plus whether the selection moved on since.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub run: Option<BatchRun>,
    pub stale: bool,
    pub running: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub progress: u8,
    pub running: bool,
}

/// POST /api/batch
///
/// Blocks until the run finishes; poll `/api/batch/progress` meanwhile.
pub async fn run_batch(
    State(state): State<AppState>,
    Json(options): Json<CleaningOptions>,
) -> Result<Json<BatchRun>, ApiError> {
    let session = state.session.clone();
    let run = tokio::task::spawn_blocking(move || session.run_batch(&options)).await??;
    Ok(Json(run))
}

/// GET /api/batch
pub async fn get_batch(State(state): State<AppState>) -> Json<BatchResponse> {
    let session = &state.session;
    Json(BatchResponse {
        run: session.batch_run(),
        stale: session.batch_is_stale(),
        running: session.is_batch_running(),
    })
}

/// GET /api/batch/progress
pub async fn get_progress(State(state): State<AppState>) -> Json<ProgressResponse> {
    Json(ProgressResponse {
        progress: state.session.progress(),
        running: state.session.is_batch_running(),
    })
}
