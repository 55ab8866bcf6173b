//! API layer - HTTP endpoint handlers organized by resource.

mod drafts;
mod export;
mod health;
mod metrics;
mod preview;
mod resolve;
mod routes;
mod settings;
mod template;
mod variables;

pub use drafts::{delete_draft, load_draft, save_draft, DraftResponse, SaveDraftRequest};
pub use export::{export_template, ExportQuery};
pub use health::{health, HealthResponse};
pub use metrics::prometheus_metrics;
pub use preview::{get_preview, render_template, upsert_preview, RenderRequest};
pub use resolve::{resolve_template, ResolveRequest, ResolveResponse};
pub use routes::api_routes;
pub use settings::{get_background, get_header_footer, put_header_footer, update_background};
pub use template::{
    create_template, delete_template, get_template, list_templates, placeholder_report,
    update_template,
};
pub use variables::{
    add_variable, delete_variable, format_key, get_variable, list_variables, rename_variable,
    update_variable, FormatKeyRequest, FormatKeyResponse, RenameVariableRequest,
};
