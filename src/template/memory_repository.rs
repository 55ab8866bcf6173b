//! In-memory template storage

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use super::repository::{sort_variables, TemplateRepository};
use super::settings::{BackgroundSettings, HeaderFooterSettings};
use super::types::{
    EmailTemplate, PreviewDataset, TemplateBundle, TemplateDetails, TemplateError,
    TemplateResult, TemplateVariable,
};

/// Template storage backed by a concurrent map.
///
/// Each template owns a bundle of its variables, preview data and settings, so
/// removing the entry cascades naturally.
pub struct MemoryTemplateRepository {
    templates: DashMap<Uuid, TemplateBundle>,
}

impl Default for MemoryTemplateRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTemplateRepository {
    pub fn new() -> Self {
        Self {
            templates: DashMap::new(),
        }
    }

    fn not_found(id: Uuid) -> TemplateError {
        TemplateError::NotFound(format!("Template {}", id))
    }

    fn details(bundle: &TemplateBundle) -> TemplateDetails {
        TemplateDetails::from(bundle.clone())
    }
}

fn ensure_unique_key(
    variables: &[TemplateVariable],
    key: &str,
    except: Option<Uuid>,
) -> TemplateResult<()> {
    let taken = variables
        .iter()
        .any(|v| v.key == key && Some(v.id) != except);
    if taken {
        return Err(TemplateError::Conflict(
            "A variable with this key already exists".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl TemplateRepository for MemoryTemplateRepository {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> TemplateResult<Vec<TemplateDetails>> {
        let mut templates: Vec<TemplateDetails> = self
            .templates
            .iter()
            .map(|entry| Self::details(entry.value()))
            .collect();
        templates.sort_by(|a, b| a.template.created_at.cmp(&b.template.created_at));
        Ok(templates)
    }

    async fn get(&self, id: Uuid) -> TemplateResult<TemplateDetails> {
        self.templates
            .get(&id)
            .map(|entry| Self::details(entry.value()))
            .ok_or_else(|| Self::not_found(id))
    }

    async fn count(&self) -> TemplateResult<usize> {
        Ok(self.templates.len())
    }

    async fn insert(
        &self,
        template: EmailTemplate,
        mut variables: Vec<TemplateVariable>,
        preview: Option<PreviewDataset>,
    ) -> TemplateResult<TemplateDetails> {
        if self.templates.contains_key(&template.id) {
            return Err(TemplateError::Conflict(format!(
                "Template {} already exists",
                template.id
            )));
        }

        for (i, variable) in variables.iter().enumerate() {
            ensure_unique_key(&variables[..i], &variable.key, None)?;
        }
        sort_variables(&mut variables);

        let bundle = TemplateBundle {
            template,
            variables,
            preview,
            background: None,
            header_footer: None,
        };
        let details = Self::details(&bundle);
        self.templates.insert(bundle.template.id, bundle);

        Ok(details)
    }

    async fn update(
        &self,
        template: EmailTemplate,
        variables: Option<Vec<TemplateVariable>>,
    ) -> TemplateResult<TemplateDetails> {
        let mut entry = self
            .templates
            .get_mut(&template.id)
            .ok_or_else(|| Self::not_found(template.id))?;

        if let Some(mut variables) = variables {
            for (i, variable) in variables.iter().enumerate() {
                ensure_unique_key(&variables[..i], &variable.key, None)?;
            }
            sort_variables(&mut variables);
            entry.variables = variables;
        }
        entry.template = template;

        Ok(Self::details(&entry))
    }

    async fn delete(&self, id: Uuid) -> TemplateResult<()> {
        self.templates
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(id))
    }

    async fn list_variables(&self, template_id: Uuid) -> TemplateResult<Vec<TemplateVariable>> {
        self.templates
            .get(&template_id)
            .map(|entry| entry.variables.clone())
            .ok_or_else(|| Self::not_found(template_id))
    }

    async fn insert_variable(&self, variable: TemplateVariable) -> TemplateResult<TemplateVariable> {
        let mut entry = self
            .templates
            .get_mut(&variable.template_id)
            .ok_or_else(|| Self::not_found(variable.template_id))?;

        ensure_unique_key(&entry.variables, &variable.key, None)?;
        entry.variables.push(variable.clone());
        sort_variables(&mut entry.variables);

        Ok(variable)
    }

    async fn update_variable(&self, variable: TemplateVariable) -> TemplateResult<TemplateVariable> {
        let mut entry = self
            .templates
            .get_mut(&variable.template_id)
            .ok_or_else(|| Self::not_found(variable.template_id))?;

        ensure_unique_key(&entry.variables, &variable.key, Some(variable.id))?;
        let slot = entry
            .variables
            .iter_mut()
            .find(|v| v.id == variable.id)
            .ok_or_else(|| TemplateError::NotFound("Variable".to_string()))?;
        *slot = variable.clone();
        sort_variables(&mut entry.variables);

        Ok(variable)
    }

    async fn delete_variable(&self, template_id: Uuid, variable_id: Uuid) -> TemplateResult<()> {
        let mut entry = self
            .templates
            .get_mut(&template_id)
            .ok_or_else(|| Self::not_found(template_id))?;

        let before = entry.variables.len();
        entry.variables.retain(|v| v.id != variable_id);
        if entry.variables.len() == before {
            return Err(TemplateError::NotFound("Variable".to_string()));
        }
        Ok(())
    }

    async fn apply_rename(
        &self,
        template: EmailTemplate,
        variable: TemplateVariable,
        preview: Option<PreviewDataset>,
    ) -> TemplateResult<()> {
        let mut entry = self
            .templates
            .get_mut(&template.id)
            .ok_or_else(|| Self::not_found(template.id))?;

        ensure_unique_key(&entry.variables, &variable.key, Some(variable.id))?;
        let slot = entry
            .variables
            .iter_mut()
            .find(|v| v.id == variable.id)
            .ok_or_else(|| TemplateError::NotFound("Variable".to_string()))?;
        *slot = variable;
        sort_variables(&mut entry.variables);

        entry.template = template;
        if preview.is_some() {
            entry.preview = preview;
        }
        Ok(())
    }

    async fn get_preview(&self, template_id: Uuid) -> TemplateResult<Option<PreviewDataset>> {
        self.templates
            .get(&template_id)
            .map(|entry| entry.preview.clone())
            .ok_or_else(|| Self::not_found(template_id))
    }

    async fn save_preview(&self, mut preview: PreviewDataset) -> TemplateResult<PreviewDataset> {
        let mut entry = self
            .templates
            .get_mut(&preview.template_id)
            .ok_or_else(|| Self::not_found(preview.template_id))?;

        if let Some(existing) = &entry.preview {
            preview.id = existing.id;
            preview.created_at = existing.created_at;
        }
        preview.updated_at = Utc::now();
        entry.preview = Some(preview.clone());

        Ok(preview)
    }

    async fn get_background(&self, template_id: Uuid) -> TemplateResult<Option<BackgroundSettings>> {
        self.templates
            .get(&template_id)
            .map(|entry| entry.background.clone())
            .ok_or_else(|| Self::not_found(template_id))
    }

    async fn save_background(
        &self,
        template_id: Uuid,
        settings: BackgroundSettings,
    ) -> TemplateResult<BackgroundSettings> {
        let mut entry = self
            .templates
            .get_mut(&template_id)
            .ok_or_else(|| Self::not_found(template_id))?;
        entry.background = Some(settings.clone());
        Ok(settings)
    }

    async fn get_header_footer(
        &self,
        template_id: Uuid,
    ) -> TemplateResult<Option<HeaderFooterSettings>> {
        self.templates
            .get(&template_id)
            .map(|entry| entry.header_footer.clone())
            .ok_or_else(|| Self::not_found(template_id))
    }

    async fn save_header_footer(
        &self,
        template_id: Uuid,
        settings: HeaderFooterSettings,
    ) -> TemplateResult<HeaderFooterSettings> {
        let mut entry = self
            .templates
            .get_mut(&template_id)
            .ok_or_else(|| Self::not_found(template_id))?;
        entry.header_footer = Some(settings.clone());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::types::VariableInput;

    fn variable(template_id: Uuid, key: &str) -> TemplateVariable {
        TemplateVariable::from_input(
            template_id,
            VariableInput {
                key: key.to_string(),
                name: key.to_string(),
                var_type: None,
                default_value: None,
                description: None,
                required: None,
            },
        )
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = MemoryTemplateRepository::new();
        let template = EmailTemplate::new("Welcome", "<p>{{.b}} {{.a}}</p>");
        let id = template.id;
        let vars = vec![variable(id, "b"), variable(id, "a")];

        repo.insert(template, vars, None).await.unwrap();

        let details = repo.get(id).await.unwrap();
        assert_eq!(details.template.name, "Welcome");
        let keys: Vec<_> = details.variables.iter().map(|v| v.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_keys() {
        let repo = MemoryTemplateRepository::new();
        let template = EmailTemplate::new("Dup", "");
        let id = template.id;

        let result = repo
            .insert(template, vec![variable(id, "a"), variable(id, "a")], None)
            .await;
        assert!(matches!(result, Err(TemplateError::Conflict(_))));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_variable_key_unique_per_template() {
        let repo = MemoryTemplateRepository::new();
        let first = EmailTemplate::new("One", "");
        let second = EmailTemplate::new("Two", "");
        let (a, b) = (first.id, second.id);
        repo.insert(first, vec![], None).await.unwrap();
        repo.insert(second, vec![], None).await.unwrap();

        repo.insert_variable(variable(a, "name")).await.unwrap();
        repo.insert_variable(variable(b, "name")).await.unwrap();
        assert!(matches!(
            repo.insert_variable(variable(a, "name")).await,
            Err(TemplateError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_update_variable_key_conflict() {
        let repo = MemoryTemplateRepository::new();
        let template = EmailTemplate::new("T", "");
        let id = template.id;
        repo.insert(template, vec![], None).await.unwrap();

        repo.insert_variable(variable(id, "a")).await.unwrap();
        let mut b = repo.insert_variable(variable(id, "b")).await.unwrap();

        b.key = "a".to_string();
        assert!(matches!(
            repo.update_variable(b.clone()).await,
            Err(TemplateError::Conflict(_))
        ));

        b.key = "c".to_string();
        let updated = repo.update_variable(b).await.unwrap();
        assert_eq!(updated.key, "c");
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let repo = MemoryTemplateRepository::new();
        let template = EmailTemplate::new("T", "");
        let id = template.id;
        repo.insert(template, vec![variable(id, "a")], None).await.unwrap();
        repo.save_background(id, BackgroundSettings::default())
            .await
            .unwrap();

        repo.delete(id).await.unwrap();

        assert!(matches!(repo.get(id).await, Err(TemplateError::NotFound(_))));
        assert!(repo.list_variables(id).await.is_err());
        assert!(repo.get_background(id).await.is_err());
        assert!(matches!(
            repo.delete(id).await,
            Err(TemplateError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_save_preview_keeps_identity() {
        let repo = MemoryTemplateRepository::new();
        let template = EmailTemplate::new("T", "");
        let id = template.id;
        repo.insert(template, vec![], None).await.unwrap();

        let first = repo
            .save_preview(PreviewDataset::new(id, None, Default::default()))
            .await
            .unwrap();
        let second = repo
            .save_preview(PreviewDataset::new(id, Some("Other".into()), Default::default()))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.name, "Other");
        assert_eq!(repo.get_preview(id).await.unwrap().unwrap().name, "Other");
    }
}
