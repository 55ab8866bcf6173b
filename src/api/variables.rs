//! Template variable endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::server::AppState;
use crate::template::{
    format_variable_key, is_valid_key, TemplateDetails, TemplateVariable, UpdateVariableRequest,
    VariableInput,
};

#[derive(Debug, Deserialize)]
pub struct RenameVariableRequest {
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct FormatKeyRequest {
    pub input: String,
}

#[derive(Debug, Serialize)]
pub struct FormatKeyResponse {
    pub key: String,
    /// Whether `key` is usable as-is
    pub valid: bool,
}

/// GET /api/v1/templates/{id}/variables - Variables ordered by key
#[tracing::instrument(name = "http.list_variables", skip(state))]
pub async fn list_variables(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<TemplateVariable>>> {
    Ok(Json(state.templates.list_variables(id).await?))
}

/// POST /api/v1/templates/{id}/variables - Declare a new variable
#[tracing::instrument(
    name = "http.add_variable",
    skip(state, input),
    fields(key = %input.key)
)]
pub async fn add_variable(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<VariableInput>,
) -> Result<(StatusCode, Json<TemplateVariable>)> {
    let variable = state.templates.add_variable(id, input).await?;
    Ok((StatusCode::CREATED, Json(variable)))
}

/// GET /api/v1/templates/{id}/variables/{variable_id}
#[tracing::instrument(name = "http.get_variable", skip(state))]
pub async fn get_variable(
    State(state): State<AppState>,
    Path((id, variable_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<TemplateVariable>> {
    Ok(Json(state.templates.get_variable(id, variable_id).await?))
}

/// PUT /api/v1/templates/{id}/variables/{variable_id} - Partial update
#[tracing::instrument(name = "http.update_variable", skip(state, request))]
pub async fn update_variable(
    State(state): State<AppState>,
    Path((id, variable_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateVariableRequest>,
) -> Result<Json<TemplateVariable>> {
    Ok(Json(
        state
            .templates
            .update_variable(id, variable_id, request)
            .await?,
    ))
}

/// DELETE /api/v1/templates/{id}/variables/{variable_id}
#[tracing::instrument(name = "http.delete_variable", skip(state))]
pub async fn delete_variable(
    State(state): State<AppState>,
    Path((id, variable_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode> {
    state.templates.delete_variable(id, variable_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/templates/{id}/variables/{variable_id}/rename
///
/// Rewrites matching placeholders in the body and moves the preview value.
#[tracing::instrument(
    name = "http.rename_variable",
    skip(state, request),
    fields(new_key = %request.key)
)]
pub async fn rename_variable(
    State(state): State<AppState>,
    Path((id, variable_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<RenameVariableRequest>,
) -> Result<Json<TemplateDetails>> {
    Ok(Json(
        state
            .templates
            .rename_variable(id, variable_id, &request.key)
            .await?,
    ))
}

/// POST /api/v1/variables/format-key - Suggest a variable key for free text
///
/// `"First Name"` becomes `"firstName"`; `valid` is false when nothing usable remains.
#[tracing::instrument(name = "http.format_variable_key", skip(request))]
pub async fn format_key(Json(request): Json<FormatKeyRequest>) -> Json<FormatKeyResponse> {
    let key = format_variable_key(&request.input);
    let valid = is_valid_key(&key);
    Json(FormatKeyResponse { key, valid })
}
