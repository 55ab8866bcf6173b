//! Backend trait for template persistence.
//!
//! Storage implementations (memory, PostgreSQL) are interchangeable behind
//! this trait. Deleting a template must remove everything attached to it.

use async_trait::async_trait;
use uuid::Uuid;

use super::settings::{BackgroundSettings, HeaderFooterSettings};
use super::types::{
    EmailTemplate, PreviewDataset, TemplateDetails, TemplateResult, TemplateVariable,
};

#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Backend identifier for health reporting
    fn backend_name(&self) -> &'static str;

    /// All templates with their variables and preview data
    async fn list(&self) -> TemplateResult<Vec<TemplateDetails>>;

    /// A single template; `NotFound` when absent
    async fn get(&self, id: Uuid) -> TemplateResult<TemplateDetails>;

    /// Number of stored templates
    async fn count(&self) -> TemplateResult<usize>;

    /// Store a template together with its variables and optional preview data
    async fn insert(
        &self,
        template: EmailTemplate,
        variables: Vec<TemplateVariable>,
        preview: Option<PreviewDataset>,
    ) -> TemplateResult<TemplateDetails>;

    /// Overwrite template fields, optionally replacing every variable
    async fn update(
        &self,
        template: EmailTemplate,
        variables: Option<Vec<TemplateVariable>>,
    ) -> TemplateResult<TemplateDetails>;

    /// Remove a template and everything attached to it
    async fn delete(&self, id: Uuid) -> TemplateResult<()>;

    /// Variables of a template ordered by key
    async fn list_variables(&self, template_id: Uuid) -> TemplateResult<Vec<TemplateVariable>>;

    /// Add a variable; `Conflict` when the key is taken
    async fn insert_variable(&self, variable: TemplateVariable) -> TemplateResult<TemplateVariable>;

    /// Overwrite a variable; `Conflict` when the new key is taken
    async fn update_variable(&self, variable: TemplateVariable) -> TemplateResult<TemplateVariable>;

    async fn delete_variable(&self, template_id: Uuid, variable_id: Uuid) -> TemplateResult<()>;

    /// Apply a variable rename together with the rewritten body and preview data
    async fn apply_rename(
        &self,
        template: EmailTemplate,
        variable: TemplateVariable,
        preview: Option<PreviewDataset>,
    ) -> TemplateResult<()>;

    async fn get_preview(&self, template_id: Uuid) -> TemplateResult<Option<PreviewDataset>>;

    /// Create or overwrite the preview dataset of a template
    async fn save_preview(&self, preview: PreviewDataset) -> TemplateResult<PreviewDataset>;

    async fn get_background(&self, template_id: Uuid) -> TemplateResult<Option<BackgroundSettings>>;

    async fn save_background(
        &self,
        template_id: Uuid,
        settings: BackgroundSettings,
    ) -> TemplateResult<BackgroundSettings>;

    async fn get_header_footer(
        &self,
        template_id: Uuid,
    ) -> TemplateResult<Option<HeaderFooterSettings>>;

    async fn save_header_footer(
        &self,
        template_id: Uuid,
        settings: HeaderFooterSettings,
    ) -> TemplateResult<HeaderFooterSettings>;
}

/// Sort variables the way every backend returns them
pub(crate) fn sort_variables(variables: &mut [TemplateVariable]) {
    variables.sort_by(|a, b| a.key.cmp(&b.key));
}
