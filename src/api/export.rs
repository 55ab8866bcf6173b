//! Template export endpoint.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::server::AppState;
use crate::template::ExportFormat;

#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

/// GET /api/v1/templates/{id}/export?format= - Download an export
///
/// Formats: `raw` (default), `with_data`, `no_backgrounds`, `layout`, `variables`.
#[tracing::instrument(name = "http.export_template", skip(state))]
pub async fn export_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ExportQuery>,
) -> Result<Response> {
    let format = match query.format.as_deref() {
        Some(value) => ExportFormat::parse(value)?,
        None => ExportFormat::default(),
    };

    let file = state.templates.export(id, format).await?;

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        file.file_name.replace('"', "")
    ))
    .map_err(|e| AppError::Internal(format!("invalid file name header: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(file.content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.content,
    )
        .into_response())
}
