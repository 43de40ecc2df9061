//! Selection handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tunekit::DataItem;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// The current selection, in selection order.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResponse {
    pub items: Vec<DataItem>,
    pub total_tokens: u64,
    pub generation: u64,
}

/// Result of a single membership change.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionChange {
    pub id: u64,
    pub selected: bool,
    pub changed: bool,
    pub count: usize,
}

fn selection_response(state: &AppState) -> SelectionResponse {
    let selection = state.session.selection();
    let (generation, items) = selection.snapshot();
    SelectionResponse {
        total_tokens: items.iter().map(|i| u64::from(i.token_count)).sum(),
        items,
        generation,
    }
}

/// GET /api/selection
pub async fn get_selection(State(state): State<AppState>) -> Json<SelectionResponse> {
    Json(selection_response(&state))
}

/// POST /api/selection/toggle/:id
pub async fn toggle_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<SelectionChange>, ApiError> {
    let selected = state.session.toggle(id)?;
    Ok(Json(SelectionChange {
        id,
        selected,
        changed: true,
        count: state.session.selection().len(),
    }))
}

/// POST /api/selection/add/:id
pub async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<SelectionChange>, ApiError> {
    let changed = state.session.select(id)?;
    Ok(Json(SelectionChange {
        id,
        selected: true,
        changed,
        count: state.session.selection().len(),
    }))
}

/// DELETE /api/selection/:id
pub async fn remove_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<SelectionChange>, ApiError> {
    let changed = state.session.deselect(id)?;
    Ok(Json(SelectionChange {
        id,
        selected: false,
        changed,
        count: state.session.selection().len(),
    }))
}

/// POST /api/selection/clear
pub async fn clear_selection(State(state): State<AppState>) -> Json<SelectionResponse> {
    state.session.clear_selection();
    Json(selection_response(&state))
}
