//! Template types and error definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::placeholder::{is_valid_key, MAX_KEY_LENGTH};
use super::settings::{BackgroundSettings, HeaderFooterSettings};

/// Default name given to a preview dataset
pub const DEFAULT_PREVIEW_NAME: &str = "Default Preview";

/// Template-specific error type
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for TemplateError {
    fn from(err: sqlx::Error) -> Self {
        TemplateError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for TemplateError {
    fn from(err: serde_json::Error) -> Self {
        TemplateError::Storage(format!("serialization: {}", err))
    }
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Declared type of a template variable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    #[default]
    Text,
    Date,
    Number,
    Email,
    Url,
    Boolean,
}

impl VariableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableType::Text => "text",
            VariableType::Date => "date",
            VariableType::Number => "number",
            VariableType::Email => "email",
            VariableType::Url => "url",
            VariableType::Boolean => "boolean",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "text" => Some(VariableType::Text),
            "date" => Some(VariableType::Date),
            "number" => Some(VariableType::Number),
            "email" => Some(VariableType::Email),
            "url" => Some(VariableType::Url),
            "boolean" => Some(VariableType::Boolean),
            _ => None,
        }
    }
}

/// An email template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub id: Uuid,

    /// Human-readable template name
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// HTML body with {{.variable}} placeholders
    pub body: String,

    /// System templates cannot be deleted
    #[serde(default)]
    pub is_system: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmailTemplate {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            body: body.into(),
            is_system: false,
            user_id: None,
            folder_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate the template
    pub fn validate(&self) -> TemplateResult<()> {
        validate_name(&self.name)
    }
}

fn validate_name(name: &str) -> TemplateResult<()> {
    if name.trim().is_empty() || name.len() > 256 {
        return Err(TemplateError::Validation(
            "Name must be 1-256 characters".to_string(),
        ));
    }
    Ok(())
}

/// A variable declared on a template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateVariable {
    pub id: Uuid,
    pub template_id: Uuid,

    /// Identifier used inside {{.key}} tokens, unique per template
    pub key: String,

    /// Display name
    pub name: String,

    #[serde(rename = "type", default)]
    pub var_type: VariableType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TemplateVariable {
    pub fn from_input(template_id: Uuid, input: VariableInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            template_id,
            key: input.key,
            name: input.name,
            var_type: input.var_type.unwrap_or_default(),
            default_value: input.default_value.filter(|v| !v.is_empty()),
            description: input.description.filter(|v| !v.is_empty()),
            required: input.required.unwrap_or(false),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> TemplateResult<()> {
        validate_key(&self.key)?;
        if self.name.trim().is_empty() {
            return Err(TemplateError::Validation(
                "Key and name are required".to_string(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn validate_key(key: &str) -> TemplateResult<()> {
    if key.is_empty() {
        return Err(TemplateError::Validation(
            "Key and name are required".to_string(),
        ));
    }
    if !is_valid_key(key) {
        return Err(TemplateError::Validation(format!(
            "Variable key '{}' must be 1-{} letters, digits or underscores",
            key, MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

/// Sample values used to resolve a template for preview and export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewDataset {
    pub id: Uuid,
    pub template_id: Uuid,
    pub name: String,
    pub data: serde_json::Map<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PreviewDataset {
    pub fn new(
        template_id: Uuid,
        name: Option<String>,
        data: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            template_id,
            name: name.unwrap_or_else(|| DEFAULT_PREVIEW_NAME.to_string()),
            data,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A template together with its variables and preview dataset
#[derive(Debug, Clone, Serialize)]
pub struct TemplateDetails {
    #[serde(flatten)]
    pub template: EmailTemplate,
    pub variables: Vec<TemplateVariable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<PreviewDataset>,
}

/// Everything stored for one template
#[derive(Debug, Clone)]
pub struct TemplateBundle {
    pub template: EmailTemplate,
    pub variables: Vec<TemplateVariable>,
    pub preview: Option<PreviewDataset>,
    pub background: Option<BackgroundSettings>,
    pub header_footer: Option<HeaderFooterSettings>,
}

impl From<TemplateBundle> for TemplateDetails {
    fn from(bundle: TemplateBundle) -> Self {
        TemplateDetails {
            template: bundle.template,
            variables: bundle.variables,
            preview: bundle.preview,
        }
    }
}

/// Variable fields supplied on create
#[derive(Debug, Clone, Deserialize)]
pub struct VariableInput {
    pub key: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub var_type: Option<VariableType>,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required: Option<bool>,
}

/// Partial variable update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVariableRequest {
    pub key: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub var_type: Option<VariableType>,
    /// Use null to clear
    #[serde(default, deserialize_with = "double_option")]
    pub default_value: Option<Option<String>>,
    /// Use null to clear
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub required: Option<bool>,
}

/// Request to create a new template
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub variables: Vec<VariableInput>,
    #[serde(default)]
    pub preview_data: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub folder_id: Option<String>,
}

/// Request to update an existing template
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTemplateRequest {
    pub name: Option<String>,

    /// Use null to clear
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    pub body: Option<String>,

    /// Replacement variables, applied only with `replace_all_variables`
    pub variables: Option<Vec<VariableInput>>,

    #[serde(default)]
    pub replace_all_variables: bool,
}

/// Keeps an explicit `null` distinct from an absent field
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Preview dataset upsert
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertPreviewRequest {
    pub name: Option<String>,
    pub data: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Response for listing templates
#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<TemplateDetails>,
    pub total: usize,
}

/// Comparison of declared variables against placeholders used in the body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderReport {
    /// Declared variable keys, sorted
    pub declared: Vec<String>,
    /// Keys used in the body, in order of first appearance
    pub used: Vec<String>,
    /// Used in the body but never declared
    pub undeclared: Vec<String>,
    /// Declared but never used in the body
    pub unused: Vec<String>,
}

/// A resolved preview
#[derive(Debug, Clone, Serialize)]
pub struct RenderedTemplate {
    pub template_id: Uuid,
    pub html: String,
    pub on_missing: super::OnMissing,
    /// Keys present in the body with no value available
    pub unresolved: Vec<String>,
}
