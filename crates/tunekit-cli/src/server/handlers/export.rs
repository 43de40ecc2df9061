//! Dataset export handler.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tunekit::ExportFormat;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Query parameters for an export; both fall back to the configured defaults.
#[derive(Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
    pub name: Option<String>,
}

/// GET /api/export?format=jsonl&name=MyDataset
///
/// Responds with the dataset as a file attachment.
pub async fn export_dataset(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let defaults = state.session.export_defaults();
    let format = match query.format {
        Some(f) => f.parse::<ExportFormat>().map_err(ApiError::BadRequest)?,
        None => defaults.format,
    };
    let name = query.name.unwrap_or_else(|| defaults.dataset_name.clone());

    let artifact = state.session.export(format, &name)?;
    let disposition = format!("attachment; filename=\"{}\"", artifact.file_name);

    Ok((
        [
            (header::CONTENT_TYPE, artifact.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response())
}
