//! Business rules over the template repository.
//!
//! Handlers call into `TemplateService`; it validates input, protects system
//! templates, keeps placeholders and variables in step on rename and resolves
//! bodies for preview and export.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use uuid::Uuid;

use crate::metrics::{ExportMetrics, RenderMetrics};
use crate::telemetry::attributes;

use super::export::{strip_backgrounds, variables_json, wrap_html_for_email, ExportFormat, ExportedFile};
use super::layout::compose_layout;
use super::placeholder::{
    extract_placeholders, rename_placeholder, resolve, value_to_string, values_from_json, OnMissing,
};
use super::repository::TemplateRepository;
use super::settings::{BackgroundSettings, HeaderFooterSettings, UpdateBackgroundRequest};
use super::types::{
    validate_key, CreateTemplateRequest, EmailTemplate, PlaceholderReport, PreviewDataset,
    RenderedTemplate, TemplateDetails, TemplateError, TemplateListResponse, TemplateResult,
    TemplateVariable, UpdateTemplateRequest, UpdateVariableRequest, UpsertPreviewRequest,
    VariableInput,
};

type JsonMap = serde_json::Map<String, serde_json::Value>;

pub struct TemplateService {
    repository: Arc<dyn TemplateRepository>,
    on_missing: OnMissing,
}

impl TemplateService {
    pub fn new(repository: Arc<dyn TemplateRepository>, on_missing: OnMissing) -> Self {
        Self {
            repository,
            on_missing,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.repository.backend_name()
    }

    /// Configured treatment of placeholders without a value
    pub fn default_on_missing(&self) -> OnMissing {
        self.on_missing
    }

    pub async fn count_templates(&self) -> TemplateResult<usize> {
        self.repository.count().await
    }

    // ------------------------------------------------------------------
    // Templates
    // ------------------------------------------------------------------

    pub async fn list_templates(&self) -> TemplateResult<TemplateListResponse> {
        let templates = self.repository.list().await?;
        let total = templates.len();
        Ok(TemplateListResponse { templates, total })
    }

    pub async fn get_template(&self, id: Uuid) -> TemplateResult<TemplateDetails> {
        self.repository.get(id).await
    }

    pub async fn create_template(&self, request: CreateTemplateRequest) -> TemplateResult<TemplateDetails> {
        let mut template = EmailTemplate::new(request.name, request.body);
        template.description = request.description.filter(|d| !d.is_empty());
        template.user_id = request.user_id;
        template.folder_id = request.folder_id;
        template.validate()?;

        let variables = build_variables(template.id, request.variables)?;
        let preview = request
            .preview_data
            .map(|data| PreviewDataset::new(template.id, None, data));

        let details = self.repository.insert(template, variables, preview).await?;

        tracing::info!(
            template_id = %details.template.id,
            name = %details.template.name,
            variables = details.variables.len(),
            "Template created"
        );
        Ok(details)
    }

    pub async fn update_template(
        &self,
        id: Uuid,
        request: UpdateTemplateRequest,
    ) -> TemplateResult<TemplateDetails> {
        let mut template = self.repository.get(id).await?.template;

        if let Some(name) = request.name {
            template.name = name;
        }
        if let Some(description) = request.description {
            template.description = description;
        }
        if let Some(body) = request.body {
            template.body = body;
        }
        template.validate()?;
        template.updated_at = Utc::now();

        let variables = match request.variables {
            Some(inputs) if request.replace_all_variables => Some(build_variables(id, inputs)?),
            _ => None,
        };
        let replaced = variables.is_some();

        let details = self.repository.update(template, variables).await?;

        tracing::info!(template_id = %id, variables_replaced = replaced, "Template updated");
        Ok(details)
    }

    /// Delete a template with everything attached to it; system templates are protected
    pub async fn delete_template(&self, id: Uuid) -> TemplateResult<()> {
        let template = self.repository.get(id).await?.template;
        if template.is_system {
            return Err(TemplateError::Forbidden(
                "Cannot delete system templates".to_string(),
            ));
        }

        self.repository.delete(id).await?;
        tracing::info!(template_id = %id, "Template deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Variables
    // ------------------------------------------------------------------

    pub async fn list_variables(&self, template_id: Uuid) -> TemplateResult<Vec<TemplateVariable>> {
        self.repository.list_variables(template_id).await
    }

    pub async fn get_variable(
        &self,
        template_id: Uuid,
        variable_id: Uuid,
    ) -> TemplateResult<TemplateVariable> {
        self.repository
            .list_variables(template_id)
            .await?
            .into_iter()
            .find(|v| v.id == variable_id)
            .ok_or_else(variable_not_found)
    }

    pub async fn add_variable(
        &self,
        template_id: Uuid,
        input: VariableInput,
    ) -> TemplateResult<TemplateVariable> {
        let variable = TemplateVariable::from_input(template_id, input);
        variable.validate()?;

        let variable = self.repository.insert_variable(variable).await?;
        tracing::debug!(template_id = %template_id, key = %variable.key, "Variable added");
        Ok(variable)
    }

    /// Partial update; a changed key must stay unique within the template
    pub async fn update_variable(
        &self,
        template_id: Uuid,
        variable_id: Uuid,
        request: UpdateVariableRequest,
    ) -> TemplateResult<TemplateVariable> {
        let mut variable = self.get_variable(template_id, variable_id).await?;

        if let Some(key) = request.key {
            variable.key = key;
        }
        if let Some(name) = request.name {
            variable.name = name;
        }
        if let Some(var_type) = request.var_type {
            variable.var_type = var_type;
        }
        if let Some(default_value) = request.default_value {
            variable.default_value = default_value.filter(|v| !v.is_empty());
        }
        if let Some(description) = request.description {
            variable.description = description.filter(|v| !v.is_empty());
        }
        if let Some(required) = request.required {
            variable.required = required;
        }
        variable.validate()?;
        variable.updated_at = Utc::now();

        self.repository.update_variable(variable).await
    }

    pub async fn delete_variable(&self, template_id: Uuid, variable_id: Uuid) -> TemplateResult<()> {
        self.repository.delete_variable(template_id, variable_id).await?;
        tracing::debug!(template_id = %template_id, variable_id = %variable_id, "Variable deleted");
        Ok(())
    }

    /// Change a variable key and carry the change into the body and preview data
    pub async fn rename_variable(
        &self,
        template_id: Uuid,
        variable_id: Uuid,
        new_key: &str,
    ) -> TemplateResult<TemplateDetails> {
        validate_key(new_key)?;

        let details = self.repository.get(template_id).await?;
        let mut variable = details
            .variables
            .iter()
            .find(|v| v.id == variable_id)
            .cloned()
            .ok_or_else(variable_not_found)?;

        if variable.key == new_key {
            return Ok(details);
        }
        if details.variables.iter().any(|v| v.key == new_key) {
            return Err(TemplateError::Conflict(
                "A variable with this key already exists".to_string(),
            ));
        }

        let old_key = std::mem::replace(&mut variable.key, new_key.to_string());
        let now = Utc::now();
        variable.updated_at = now;

        let mut template = details.template;
        template.body = rename_placeholder(&template.body, &old_key, new_key).into_owned();
        template.updated_at = now;

        let preview = details.preview.and_then(|mut preview| {
            let value = preview.data.remove(&old_key)?;
            preview.data.insert(new_key.to_string(), value);
            preview.updated_at = now;
            Some(preview)
        });

        self.repository
            .apply_rename(template, variable, preview)
            .await?;

        tracing::info!(
            template_id = %template_id,
            old_key = %old_key,
            new_key = %new_key,
            "Variable renamed"
        );
        self.repository.get(template_id).await
    }

    // ------------------------------------------------------------------
    // Preview data and rendering
    // ------------------------------------------------------------------

    pub async fn get_preview(&self, template_id: Uuid) -> TemplateResult<PreviewDataset> {
        self.repository
            .get_preview(template_id)
            .await?
            .ok_or_else(|| TemplateError::NotFound("Preview data".to_string()))
    }

    /// Create the preview dataset or overwrite the supplied fields of the existing one
    pub async fn upsert_preview(
        &self,
        template_id: Uuid,
        request: UpsertPreviewRequest,
    ) -> TemplateResult<PreviewDataset> {
        let name = request.name.filter(|n| !n.trim().is_empty());

        let preview = match self.repository.get_preview(template_id).await? {
            Some(mut existing) => {
                if let Some(name) = name {
                    existing.name = name;
                }
                if let Some(data) = request.data {
                    existing.data = data;
                }
                existing
            }
            None => PreviewDataset::new(template_id, name, request.data.unwrap_or_default()),
        };

        self.repository.save_preview(preview).await
    }

    /// Resolve the body with variable defaults, then stored preview data, then `overrides`
    pub async fn render_preview(
        &self,
        template_id: Uuid,
        overrides: Option<&JsonMap>,
        on_missing: Option<OnMissing>,
    ) -> TemplateResult<RenderedTemplate> {
        let details = self.repository.get(template_id).await?;
        let on_missing = on_missing.unwrap_or(self.on_missing);

        let mut values = effective_values(&details);
        if let Some(overrides) = overrides {
            values.extend(values_from_json(overrides));
        }

        let html = self.resolve_timed(&details.template.body, &values, on_missing);
        let unresolved: Vec<String> = extract_placeholders(&details.template.body)
            .into_iter()
            .filter(|key| !values.contains_key(key))
            .collect();

        attributes::record(attributes::template_id(template_id));
        attributes::record(attributes::unresolved_count(unresolved.len()));
        RenderMetrics::record_unresolved(unresolved.len());

        Ok(RenderedTemplate {
            template_id,
            html,
            on_missing,
            unresolved,
        })
    }

    /// Compare placeholders used in the body with declared variables
    pub async fn placeholder_report(&self, template_id: Uuid) -> TemplateResult<PlaceholderReport> {
        let details = self.repository.get(template_id).await?;

        let declared: Vec<String> = details.variables.iter().map(|v| v.key.clone()).collect();
        let used = extract_placeholders(&details.template.body);

        let undeclared = used
            .iter()
            .filter(|key| !declared.contains(key))
            .cloned()
            .collect();
        let unused = declared
            .iter()
            .filter(|key| !used.contains(key))
            .cloned()
            .collect();

        Ok(PlaceholderReport {
            declared,
            used,
            undeclared,
            unused,
        })
    }

    // ------------------------------------------------------------------
    // Styling settings
    // ------------------------------------------------------------------

    pub async fn get_background(&self, template_id: Uuid) -> TemplateResult<BackgroundSettings> {
        self.repository
            .get_background(template_id)
            .await?
            .ok_or_else(|| TemplateError::NotFound("Background settings".to_string()))
    }

    /// Merge non-empty fields over the stored settings (defaults on first write)
    pub async fn upsert_background(
        &self,
        template_id: Uuid,
        update: UpdateBackgroundRequest,
    ) -> TemplateResult<BackgroundSettings> {
        let current = self
            .repository
            .get_background(template_id)
            .await?
            .unwrap_or_default();

        self.repository
            .save_background(template_id, current.merged(update))
            .await
    }

    pub async fn get_header_footer(&self, template_id: Uuid) -> TemplateResult<HeaderFooterSettings> {
        self.repository
            .get_header_footer(template_id)
            .await?
            .ok_or_else(|| TemplateError::NotFound("Header/footer settings".to_string()))
    }

    pub async fn put_header_footer(
        &self,
        template_id: Uuid,
        settings: HeaderFooterSettings,
    ) -> TemplateResult<HeaderFooterSettings> {
        if settings.header.logo_width == 0 {
            return Err(TemplateError::Validation(
                "Logo width must be greater than zero".to_string(),
            ));
        }
        self.repository
            .save_header_footer(template_id, settings)
            .await
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    pub async fn export(&self, template_id: Uuid, format: ExportFormat) -> TemplateResult<ExportedFile> {
        let details = self.repository.get(template_id).await?;
        let values = effective_values(&details);
        let body = &details.template.body;

        let content = match format {
            ExportFormat::Raw => wrap_html_for_email(body),
            ExportFormat::WithData => {
                wrap_html_for_email(&self.resolve_timed(body, &values, self.on_missing))
            }
            ExportFormat::NoBackgrounds => strip_backgrounds(&wrap_html_for_email(
                &self.resolve_timed(body, &values, self.on_missing),
            )),
            ExportFormat::Layout => {
                let background = self
                    .repository
                    .get_background(template_id)
                    .await?
                    .unwrap_or_default();
                let header_footer = self.repository.get_header_footer(template_id).await?;
                let document = compose_layout(
                    &details.template.name,
                    body,
                    &background,
                    header_footer.as_ref(),
                );
                self.resolve_timed(&document, &values, self.on_missing)
            }
            ExportFormat::Variables => {
                let mut keyed: BTreeMap<String, String> = details
                    .variables
                    .iter()
                    .map(|v| (v.key.clone(), String::new()))
                    .collect();
                keyed.extend(values);
                variables_json(&keyed)?
            }
        };

        attributes::record(attributes::template_id(template_id));
        attributes::record(attributes::export_format(format.as_str()));
        ExportMetrics::record(format.as_str());

        tracing::debug!(
            template_id = %template_id,
            format = format.as_str(),
            bytes = content.len(),
            "Template exported"
        );
        Ok(ExportedFile::new(&details.template.name, format, content))
    }

    fn resolve_timed(&self, text: &str, values: &HashMap<String, String>, on_missing: OnMissing) -> String {
        let started = Instant::now();
        let resolved = resolve(text, values, on_missing);
        RenderMetrics::record(on_missing, started.elapsed());
        resolved
    }
}

fn variable_not_found() -> TemplateError {
    TemplateError::NotFound("Variable".to_string())
}

/// Validate inputs and reject keys repeated within one request
fn build_variables(template_id: Uuid, inputs: Vec<VariableInput>) -> TemplateResult<Vec<TemplateVariable>> {
    let mut variables: Vec<TemplateVariable> = Vec::with_capacity(inputs.len());
    for input in inputs {
        let variable = TemplateVariable::from_input(template_id, input);
        variable.validate()?;
        if variables.iter().any(|v| v.key == variable.key) {
            return Err(TemplateError::Conflict(format!(
                "Duplicate variable key '{}'",
                variable.key
            )));
        }
        variables.push(variable);
    }
    Ok(variables)
}

/// Variable defaults overlaid by the stored preview dataset
fn effective_values(details: &TemplateDetails) -> HashMap<String, String> {
    let mut values: HashMap<String, String> = details
        .variables
        .iter()
        .filter_map(|v| {
            v.default_value
                .as_ref()
                .map(|default| (v.key.clone(), default.clone()))
        })
        .collect();

    if let Some(preview) = &details.preview {
        values.extend(
            preview
                .data
                .iter()
                .map(|(key, value)| (key.clone(), value_to_string(value))),
        );
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::MemoryTemplateRepository;
    use crate::template::VariableType;
    use serde_json::json;

    fn service() -> TemplateService {
        TemplateService::new(Arc::new(MemoryTemplateRepository::new()), OnMissing::Empty)
    }

    fn input(key: &str, default_value: Option<&str>) -> VariableInput {
        VariableInput {
            key: key.to_string(),
            name: key.to_string(),
            var_type: None,
            default_value: default_value.map(str::to_string),
            description: None,
            required: None,
        }
    }

    fn object(value: serde_json::Value) -> JsonMap {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    async fn create(service: &TemplateService, body: &str, variables: Vec<VariableInput>) -> TemplateDetails {
        service
            .create_template(CreateTemplateRequest {
                name: "Order Update".to_string(),
                description: None,
                body: body.to_string(),
                variables,
                preview_data: None,
                user_id: None,
                folder_id: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_keys() {
        let service = service();
        let result = service
            .create_template(CreateTemplateRequest {
                name: "Dup".to_string(),
                description: None,
                body: String::new(),
                variables: vec![input("a", None), input("a", None)],
                preview_data: None,
                user_id: None,
                folder_id: None,
            })
            .await;
        assert!(matches!(result, Err(TemplateError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let service = service();
        let result = service
            .create_template(CreateTemplateRequest {
                name: " ".to_string(),
                description: None,
                body: String::new(),
                variables: vec![],
                preview_data: None,
                user_id: None,
                folder_id: None,
            })
            .await;
        assert!(matches!(result, Err(TemplateError::Validation(_))));
    }

    #[tokio::test]
    async fn test_system_template_cannot_be_deleted() {
        let repo = Arc::new(MemoryTemplateRepository::new());
        let mut template = EmailTemplate::new("System", "<p>x</p>");
        template.is_system = true;
        let id = template.id;
        repo.insert(template, vec![], None).await.unwrap();

        let service = TemplateService::new(repo, OnMissing::Empty);
        assert!(matches!(
            service.delete_template(id).await,
            Err(TemplateError::Forbidden(_))
        ));
        assert!(service.get_template(id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let service = service();
        let details = create(&service, "{{.a}}", vec![input("a", None)]).await;
        let id = details.template.id;
        service
            .upsert_preview(
                id,
                UpsertPreviewRequest {
                    name: None,
                    data: Some(object(json!({"a": "1"}))),
                },
            )
            .await
            .unwrap();

        service.delete_template(id).await.unwrap();

        assert!(matches!(service.get_template(id).await, Err(TemplateError::NotFound(_))));
        assert!(matches!(service.list_variables(id).await, Err(TemplateError::NotFound(_))));
        assert!(matches!(service.get_preview(id).await, Err(TemplateError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_add_variable_conflict_and_defaults() {
        let service = service();
        let id = create(&service, "", vec![input("firstName", None)]).await.template.id;

        let added = service.add_variable(id, input("lastName", None)).await.unwrap();
        assert_eq!(added.var_type, VariableType::Text);
        assert!(!added.required);

        assert!(matches!(
            service.add_variable(id, input("firstName", None)).await,
            Err(TemplateError::Conflict(_))
        ));

        let keys: Vec<String> = service
            .list_variables(id)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.key)
            .collect();
        assert_eq!(keys, vec!["firstName", "lastName"]);
    }

    #[tokio::test]
    async fn test_update_variable_key_conflict() {
        let service = service();
        let details = create(&service, "", vec![input("a", None), input("b", None)]).await;
        let id = details.template.id;
        let b = details.variables.iter().find(|v| v.key == "b").unwrap().id;

        let result = service
            .update_variable(
                id,
                b,
                UpdateVariableRequest {
                    key: Some("a".to_string()),
                    ..UpdateVariableRequest::default()
                },
            )
            .await;
        assert!(matches!(result, Err(TemplateError::Conflict(_))));

        let updated = service
            .update_variable(
                id,
                b,
                UpdateVariableRequest {
                    default_value: Some(Some("x".to_string())),
                    required: Some(true),
                    ..UpdateVariableRequest::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.default_value.as_deref(), Some("x"));
        assert!(updated.required);
    }

    #[tokio::test]
    async fn test_rename_rewrites_body_and_preview() {
        let service = service();
        let details = create(
            &service,
            "Hi {{.name}} / {{ .name }} / {{.other}}",
            vec![input("name", None), input("other", None)],
        )
        .await;
        let id = details.template.id;
        let var_id = details.variables.iter().find(|v| v.key == "name").unwrap().id;
        service
            .upsert_preview(
                id,
                UpsertPreviewRequest {
                    name: None,
                    data: Some(object(json!({"name": "Jane", "other": "x"}))),
                },
            )
            .await
            .unwrap();

        let renamed = service.rename_variable(id, var_id, "firstName").await.unwrap();

        assert_eq!(
            renamed.template.body,
            "Hi {{.firstName}} / {{.firstName}} / {{.other}}"
        );
        assert!(renamed.variables.iter().any(|v| v.key == "firstName"));
        let preview = renamed.preview.unwrap();
        assert_eq!(preview.data["firstName"], "Jane");
        assert!(!preview.data.contains_key("name"));
    }

    #[tokio::test]
    async fn test_rename_validation() {
        let service = service();
        let details = create(&service, "", vec![input("a", None), input("b", None)]).await;
        let id = details.template.id;
        let a = details.variables.iter().find(|v| v.key == "a").unwrap().id;

        assert!(matches!(
            service.rename_variable(id, a, "b").await,
            Err(TemplateError::Conflict(_))
        ));
        assert!(matches!(
            service.rename_variable(id, a, "bad key").await,
            Err(TemplateError::Validation(_))
        ));
        assert!(matches!(
            service.rename_variable(id, Uuid::new_v4(), "c").await,
            Err(TemplateError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_preview_upsert_keeps_unsupplied_fields() {
        let service = service();
        let id = create(&service, "", vec![]).await.template.id;

        assert!(matches!(service.get_preview(id).await, Err(TemplateError::NotFound(_))));

        let first = service
            .upsert_preview(
                id,
                UpsertPreviewRequest {
                    name: None,
                    data: Some(object(json!({"a": "1"}))),
                },
            )
            .await
            .unwrap();
        assert_eq!(first.name, "Default Preview");

        let second = service
            .upsert_preview(
                id,
                UpsertPreviewRequest {
                    name: Some("Holiday".to_string()),
                    data: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.name, "Holiday");
        assert_eq!(second.data["a"], "1");
    }

    #[tokio::test]
    async fn test_render_overlay_order() {
        let service = service();
        let id = create(
            &service,
            "{{.a}}-{{.b}}-{{.c}}-{{.d}}",
            vec![input("a", Some("defA")), input("b", Some("defB")), input("c", Some("defC"))],
        )
        .await
        .template
        .id;
        service
            .upsert_preview(
                id,
                UpsertPreviewRequest {
                    name: None,
                    data: Some(object(json!({"b": "dataB", "c": "dataC"}))),
                },
            )
            .await
            .unwrap();

        let overrides = object(json!({"c": 3}));
        let rendered = service
            .render_preview(id, Some(&overrides), None)
            .await
            .unwrap();
        assert_eq!(rendered.html, "defA-dataB-3-");
        assert_eq!(rendered.unresolved, vec!["d"]);
        assert_eq!(rendered.on_missing, OnMissing::Empty);

        let preserved = service
            .render_preview(id, None, Some(OnMissing::Preserve))
            .await
            .unwrap();
        assert_eq!(preserved.html, "defA-dataB-dataC-{{.d}}");
    }

    #[tokio::test]
    async fn test_placeholder_report() {
        let service = service();
        let id = create(
            &service,
            "{{.used}} {{.ghost}} {{.used}}",
            vec![input("used", None), input("idle", None)],
        )
        .await
        .template
        .id;

        let report = service.placeholder_report(id).await.unwrap();
        assert_eq!(report.used, vec!["used", "ghost"]);
        assert_eq!(report.undeclared, vec!["ghost"]);
        assert_eq!(report.unused, vec!["idle"]);
    }

    #[tokio::test]
    async fn test_background_merge() {
        let service = service();
        let id = create(&service, "", vec![]).await.template.id;

        assert!(matches!(service.get_background(id).await, Err(TemplateError::NotFound(_))));

        let saved = service
            .upsert_background(
                id,
                UpdateBackgroundRequest {
                    body_bg_color: Some("#000000".to_string()),
                    max_width: Some(String::new()),
                    ..UpdateBackgroundRequest::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(saved.body_bg_color, "#000000");
        assert_eq!(saved.max_width, "650px");
        assert_eq!(saved.header_bg_color, "#33A8DF");

        let merged = service
            .upsert_background(
                id,
                UpdateBackgroundRequest {
                    header_bg_color: Some("#111111".to_string()),
                    ..UpdateBackgroundRequest::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(merged.body_bg_color, "#000000");
        assert_eq!(merged.header_bg_color, "#111111");
    }

    #[tokio::test]
    async fn test_header_footer_replace() {
        let service = service();
        let id = create(&service, "", vec![]).await.template.id;

        let mut settings = HeaderFooterSettings::default();
        settings.header.content = "Acme".to_string();
        service.put_header_footer(id, settings.clone()).await.unwrap();
        assert_eq!(service.get_header_footer(id).await.unwrap(), settings);

        settings.header.logo_width = 0;
        assert!(matches!(
            service.put_header_footer(id, settings).await,
            Err(TemplateError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_export_formats() {
        let service = service();
        let id = create(
            &service,
            r#"<p style="background-color: red;">{{.name}}</p>"#,
            vec![input("name", Some("Jane")), input("unset", None)],
        )
        .await
        .template
        .id;

        let raw = service.export(id, ExportFormat::Raw).await.unwrap();
        assert_eq!(raw.file_name, "order-update-template.html");
        assert!(raw.content.contains("{{.name}}"));

        let with_data = service.export(id, ExportFormat::WithData).await.unwrap();
        assert!(with_data.content.contains(">Jane</p>"));
        assert!(with_data.content.contains("background-color: red;"));

        let plain = service.export(id, ExportFormat::NoBackgrounds).await.unwrap();
        assert!(plain.content.contains("background-color: #FFFFFF;"));
        assert!(!plain.content.contains("background-color: red;"));

        let layout = service.export(id, ExportFormat::Layout).await.unwrap();
        assert_eq!(layout.file_name, "order-update-layout.html");
        assert!(layout.content.contains(">Jane</p>"));
        assert!(layout.content.contains("max-width: 650px;"));

        let variables = service.export(id, ExportFormat::Variables).await.unwrap();
        assert_eq!(variables.content_type, "application/json");
        let parsed: serde_json::Value = serde_json::from_str(&variables.content).unwrap();
        assert_eq!(parsed, json!({"name": "Jane", "unset": ""}));
    }

    #[tokio::test]
    async fn test_layout_export_resolves_footer_tokens() {
        let service = service();
        let id = create(&service, "<p>x</p>", vec![input("unsubscribeUrl", Some("https://u.example"))])
            .await
            .template
            .id;
        service
            .put_header_footer(id, HeaderFooterSettings::default())
            .await
            .unwrap();

        let layout = service.export(id, ExportFormat::Layout).await.unwrap();
        assert!(layout.content.contains(r#"href="https://u.example""#));
    }
}
