use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::server::{api_key_auth, AppState};

use super::drafts::{delete_draft, load_draft, save_draft};
use super::export::export_template;
use super::health::health;
use super::metrics::prometheus_metrics;
use super::preview::{get_preview, render_template, upsert_preview};
use super::resolve::resolve_template;
use super::settings::{get_background, get_header_footer, put_header_footer, update_background};
use super::template::{
    create_template, delete_template, get_template, list_templates, placeholder_report,
    update_template,
};
use super::variables::{
    add_variable, delete_variable, format_key, get_variable, list_variables, rename_variable,
    update_variable,
};

pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health & Metrics
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        .nest(
            "/api/v1",
            Router::new()
                // Templates
                .route("/templates", get(list_templates).post(create_template))
                .route(
                    "/templates/{id}",
                    get(get_template).put(update_template).delete(delete_template),
                )
                .route("/templates/{id}/placeholders", get(placeholder_report))
                // Variables
                .route(
                    "/templates/{id}/variables",
                    get(list_variables).post(add_variable),
                )
                .route(
                    "/templates/{id}/variables/{variable_id}",
                    get(get_variable).put(update_variable).delete(delete_variable),
                )
                .route(
                    "/templates/{id}/variables/{variable_id}/rename",
                    post(rename_variable),
                )
                .route("/variables/format-key", post(format_key))
                // Preview
                .route(
                    "/templates/{id}/preview",
                    get(get_preview).put(upsert_preview),
                )
                .route("/templates/{id}/render", post(render_template))
                // Styling
                .route(
                    "/templates/{id}/background",
                    get(get_background).put(update_background),
                )
                .route(
                    "/templates/{id}/header-footer",
                    get(get_header_footer).put(put_header_footer),
                )
                // Export
                .route("/templates/{id}/export", get(export_template))
                // Stateless resolver
                .route("/resolve", post(resolve_template))
                // Drafts
                .route(
                    "/drafts/{key}",
                    get(load_draft).put(save_draft).delete(delete_draft),
                )
                .route_layer(middleware::from_fn_with_state(state, api_key_auth)),
        )
}
