//! Catalog, classification and statistics handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tunekit::{Classification, DataItem, SelectionStats};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// One catalog entry with its session annotations.
#[derive(Serialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub item: DataItem,
    pub selected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
}

#[derive(Serialize)]
pub struct CatalogResponse {
    pub items: Vec<CatalogEntry>,
    pub provider: String,
}

/// GET /api/catalog
pub async fn get_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    let session = &state.session;
    let items = session
        .catalog()
        .items()
        .iter()
        .map(|item| CatalogEntry {
            selected: session.selection().is_selected(item.id),
            classification: session.classification(item.id),
            item: item.clone(),
        })
        .collect();

    Json(CatalogResponse {
        items,
        provider: session.provider_name().to_string(),
    })
}

/// POST /api/classify/:id
pub async fn classify_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Classification>, ApiError> {
    let session = state.session.clone();
    let classification = tokio::task::spawn_blocking(move || session.classify(id)).await??;
    Ok(Json(classification))
}

/// GET /api/stats
pub async fn get_stats(State(state): State<AppState>) -> Json<SelectionStats> {
    Json(state.session.stats())
}
