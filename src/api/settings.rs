//! Background and header/footer settings endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::Result;
use crate::server::AppState;
use crate::template::{BackgroundSettings, HeaderFooterSettings, UpdateBackgroundRequest};

/// GET /api/v1/templates/{id}/background
#[tracing::instrument(name = "http.get_background", skip(state))]
pub async fn get_background(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BackgroundSettings>> {
    Ok(Json(state.templates.get_background(id).await?))
}

/// PUT /api/v1/templates/{id}/background - Merge non-empty fields
#[tracing::instrument(name = "http.update_background", skip(state, request))]
pub async fn update_background(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBackgroundRequest>,
) -> Result<Json<BackgroundSettings>> {
    Ok(Json(state.templates.upsert_background(id, request).await?))
}

/// GET /api/v1/templates/{id}/header-footer
#[tracing::instrument(name = "http.get_header_footer", skip(state))]
pub async fn get_header_footer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HeaderFooterSettings>> {
    Ok(Json(state.templates.get_header_footer(id).await?))
}

/// PUT /api/v1/templates/{id}/header-footer - Replace the whole record
#[tracing::instrument(name = "http.put_header_footer", skip(state, settings))]
pub async fn put_header_footer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(settings): Json<HeaderFooterSettings>,
) -> Result<Json<HeaderFooterSettings>> {
    Ok(Json(state.templates.put_header_footer(id, settings).await?))
}
