//! Template CRUD endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::Result;
use crate::server::AppState;
use crate::template::{
    CreateTemplateRequest, PlaceholderReport, TemplateDetails, TemplateListResponse,
    UpdateTemplateRequest,
};

/// POST /api/v1/templates - Create a new template
#[tracing::instrument(
    name = "http.create_template",
    skip(state, request),
    fields(name = %request.name)
)]
pub async fn create_template(
    State(state): State<AppState>,
    Json(request): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<TemplateDetails>)> {
    let created = state.templates.create_template(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/templates - List all templates
#[tracing::instrument(name = "http.list_templates", skip(state))]
pub async fn list_templates(State(state): State<AppState>) -> Result<Json<TemplateListResponse>> {
    Ok(Json(state.templates.list_templates().await?))
}

/// GET /api/v1/templates/{id} - Get a template with variables and preview data
#[tracing::instrument(name = "http.get_template", skip(state))]
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TemplateDetails>> {
    Ok(Json(state.templates.get_template(id).await?))
}

/// PUT /api/v1/templates/{id} - Update an existing template
#[tracing::instrument(name = "http.update_template", skip(state, request))]
pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTemplateRequest>,
) -> Result<Json<TemplateDetails>> {
    Ok(Json(state.templates.update_template(id, request).await?))
}

/// DELETE /api/v1/templates/{id} - Delete a template
#[tracing::instrument(name = "http.delete_template", skip(state))]
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.templates.delete_template(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/templates/{id}/placeholders - Declared vs used placeholder keys
#[tracing::instrument(name = "http.placeholder_report", skip(state))]
pub async fn placeholder_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlaceholderReport>> {
    Ok(Json(state.templates.placeholder_report(id).await?))
}
