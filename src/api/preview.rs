//! Preview dataset and render endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::Result;
use crate::server::AppState;
use crate::template::{OnMissing, PreviewDataset, RenderedTemplate, UpsertPreviewRequest};

#[derive(Debug, Default, Deserialize)]
pub struct RenderRequest {
    /// Values applied over variable defaults and stored preview data
    #[serde(default)]
    pub values: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub on_missing: Option<OnMissing>,
}

/// GET /api/v1/templates/{id}/preview
#[tracing::instrument(name = "http.get_preview", skip(state))]
pub async fn get_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PreviewDataset>> {
    Ok(Json(state.templates.get_preview(id).await?))
}

/// PUT /api/v1/templates/{id}/preview - Create or update the preview dataset
#[tracing::instrument(name = "http.upsert_preview", skip(state, request))]
pub async fn upsert_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpsertPreviewRequest>,
) -> Result<Json<PreviewDataset>> {
    Ok(Json(state.templates.upsert_preview(id, request).await?))
}

/// POST /api/v1/templates/{id}/render - Resolve the body for preview
#[tracing::instrument(name = "http.render_template", skip(state, request))]
pub async fn render_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<RenderedTemplate>> {
    let rendered = state
        .templates
        .render_preview(id, request.values.as_ref(), request.on_missing)
        .await?;
    Ok(Json(rendered))
}
