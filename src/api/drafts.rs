//! Draft storage endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::metrics::DraftMetrics;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveDraftRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub key: String,
    pub content: String,
}

/// GET /api/v1/drafts/{key}
#[tracing::instrument(name = "http.load_draft", skip(state))]
pub async fn load_draft(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DraftResponse>> {
    match state.drafts.load(&key).await? {
        Some(content) => Ok(Json(DraftResponse { key, content })),
        None => Err(AppError::NotFound(format!("Draft '{}' not found", key))),
    }
}

/// PUT /api/v1/drafts/{key}
#[tracing::instrument(
    name = "http.save_draft",
    skip(state, request),
    fields(bytes = request.content.len())
)]
pub async fn save_draft(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<SaveDraftRequest>,
) -> Result<Json<DraftResponse>> {
    state.drafts.save(&key, &request.content).await?;
    DraftMetrics::record_saved();

    Ok(Json(DraftResponse {
        key,
        content: request.content,
    }))
}

/// DELETE /api/v1/drafts/{key}
#[tracing::instrument(name = "http.delete_draft", skip(state))]
pub async fn delete_draft(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<StatusCode> {
    if state.drafts.delete(&key).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Draft '{}' not found", key)))
    }
}
