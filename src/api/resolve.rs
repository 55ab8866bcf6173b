//! Stateless placeholder resolution endpoint.

use std::time::Instant;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::metrics::RenderMetrics;
use crate::server::AppState;
use crate::template::{extract_placeholders, resolve, values_from_json, OnMissing};

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub template: String,
    #[serde(default)]
    pub values: serde_json::Map<String, serde_json::Value>,
    /// Falls back to the configured `render.on_missing`
    #[serde(default)]
    pub on_missing: Option<OnMissing>,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub result: String,
    pub on_missing: OnMissing,
    /// Keys found in the template with no value supplied
    pub unresolved: Vec<String>,
}

/// POST /api/v1/resolve - Resolve `{{.key}}` tokens against supplied values
#[tracing::instrument(name = "http.resolve", skip(state, request))]
pub async fn resolve_template(
    State(state): State<AppState>,
    Json(request): Json<ResolveRequest>,
) -> Json<ResolveResponse> {
    let on_missing = request
        .on_missing
        .unwrap_or_else(|| state.templates.default_on_missing());
    let values = values_from_json(&request.values);

    let started = Instant::now();
    let result = resolve(&request.template, &values, on_missing);
    RenderMetrics::record(on_missing, started.elapsed());

    let unresolved: Vec<String> = extract_placeholders(&request.template)
        .into_iter()
        .filter(|key| !values.contains_key(key))
        .collect();
    RenderMetrics::record_unresolved(unresolved.len());

    Json(ResolveResponse {
        result,
        on_missing,
        unresolved,
    })
}
