//! Email templates with `{{.key}}` placeholders.
//!
//! - `placeholder`: token resolution and placeholder tooling
//! - `types` / `settings`: templates, variables, preview data and styling
//! - `repository`: storage trait with memory and PostgreSQL backends
//! - `service`: business rules used by the HTTP handlers
//! - `export` / `layout`: downloadable HTML and JSON outputs
//!
//! ```ignore
//! let values = HashMap::from([("firstName".to_string(), "Jane".to_string())]);
//! let html = resolve("Hello {{.firstName}}", &values, OnMissing::Empty);
//! assert_eq!(html, "Hello Jane");
//! ```

pub mod export;
mod factory;
pub mod layout;
mod memory_repository;
pub mod placeholder;
mod postgres_repository;
mod repository;
mod seed;
mod service;
pub mod settings;
mod types;

pub use export::{ExportFormat, ExportedFile};
pub use factory::create_template_repository;
pub use memory_repository::MemoryTemplateRepository;
pub use placeholder::{
    extract_placeholders, format_variable_key, is_valid_key, rename_placeholder, resolve,
    values_from_json, OnMissing,
};
pub use postgres_repository::PostgresTemplateRepository;
pub use repository::TemplateRepository;
pub use seed::seed_defaults;
pub use service::TemplateService;
pub use settings::{
    BackgroundSettings, FooterSettings, HeaderFooterSettings, HeaderSettings, LogoAlignment,
    SocialLink, UpdateBackgroundRequest,
};
pub use types::{
    CreateTemplateRequest, EmailTemplate, PlaceholderReport, PreviewDataset, RenderedTemplate,
    TemplateDetails, TemplateError, TemplateListResponse, TemplateResult, TemplateVariable,
    UpdateTemplateRequest, UpdateVariableRequest, UpsertPreviewRequest, VariableInput,
    VariableType,
};
