//! PostgreSQL-based template storage.
//!
//! Tables (see `postgres::schema`):
//! - `email_templates` - template rows
//! - `template_variables` - one row per variable, unique on (template_id, key)
//! - `preview_datasets` - at most one row per template, JSONB data
//! - `template_backgrounds` / `template_header_footers` - JSONB settings
//!
//! Child tables reference `email_templates` with `ON DELETE CASCADE`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::repository::TemplateRepository;
use super::settings::{BackgroundSettings, HeaderFooterSettings};
use super::types::{
    EmailTemplate, PreviewDataset, TemplateDetails, TemplateError, TemplateResult,
    TemplateVariable, VariableType,
};

type TemplateRow = (
    Uuid,
    String,
    Option<String>,
    String,
    bool,
    Option<String>,
    Option<String>,
    DateTime<Utc>,
    DateTime<Utc>,
);

type VariableRow = (
    Uuid,
    Uuid,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    bool,
    DateTime<Utc>,
    DateTime<Utc>,
);

type PreviewRow = (
    Uuid,
    Uuid,
    String,
    serde_json::Value,
    DateTime<Utc>,
    DateTime<Utc>,
);

const TEMPLATE_COLUMNS: &str =
    "id, name, description, body, is_system, user_id, folder_id, created_at, updated_at";

const VARIABLE_COLUMNS: &str = "id, template_id, key, name, var_type, default_value, description, required, created_at, updated_at";

fn template_from_row(row: TemplateRow) -> EmailTemplate {
    let (id, name, description, body, is_system, user_id, folder_id, created_at, updated_at) = row;
    EmailTemplate {
        id,
        name,
        description,
        body,
        is_system,
        user_id,
        folder_id,
        created_at,
        updated_at,
    }
}

fn variable_from_row(row: VariableRow) -> TemplateVariable {
    let (
        id,
        template_id,
        key,
        name,
        var_type,
        default_value,
        description,
        required,
        created_at,
        updated_at,
    ) = row;

    let var_type = VariableType::parse(&var_type).unwrap_or_else(|| {
        tracing::warn!(variable_id = %id, var_type = %var_type, "Unknown variable type, using text");
        VariableType::Text
    });

    TemplateVariable {
        id,
        template_id,
        key,
        name,
        var_type,
        default_value,
        description,
        required,
        created_at,
        updated_at,
    }
}

fn preview_from_row(row: PreviewRow) -> PreviewDataset {
    let (id, template_id, name, data, created_at, updated_at) = row;
    let data = match data {
        serde_json::Value::Object(map) => map,
        other => {
            tracing::warn!(
                preview_id = %id,
                "Preview data is not an object, ignoring: {}",
                other
            );
            serde_json::Map::new()
        }
    };
    PreviewDataset {
        id,
        template_id,
        name,
        data,
        created_at,
        updated_at,
    }
}

/// Map unique-key violations to `Conflict`
fn map_write_error(err: sqlx::Error) -> TemplateError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => TemplateError::Conflict(
            "A variable with this key already exists".to_string(),
        ),
        _ => TemplateError::from(err),
    }
}

fn not_found(id: Uuid) -> TemplateError {
    TemplateError::NotFound(format!("Template {}", id))
}

/// PostgreSQL template repository
pub struct PostgresTemplateRepository {
    pool: PgPool,
}

impl PostgresTemplateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ensure_template(&self, id: Uuid) -> TemplateResult<()> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM email_templates WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if exists {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    async fn insert_variable_tx(
        tx: &mut Transaction<'_, Postgres>,
        variable: &TemplateVariable,
    ) -> TemplateResult<()> {
        sqlx::query(&format!(
            "INSERT INTO template_variables ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
            VARIABLE_COLUMNS
        ))
        .bind(variable.id)
        .bind(variable.template_id)
        .bind(&variable.key)
        .bind(&variable.name)
        .bind(variable.var_type.as_str())
        .bind(&variable.default_value)
        .bind(&variable.description)
        .bind(variable.required)
        .bind(variable.created_at)
        .bind(variable.updated_at)
        .execute(&mut **tx)
        .await
        .map_err(map_write_error)?;
        Ok(())
    }

    async fn update_variable_tx(
        tx: &mut Transaction<'_, Postgres>,
        variable: &TemplateVariable,
    ) -> TemplateResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE template_variables
            SET key = $3, name = $4, var_type = $5, default_value = $6,
                description = $7, required = $8, updated_at = $9
            WHERE id = $1 AND template_id = $2
            "#,
        )
        .bind(variable.id)
        .bind(variable.template_id)
        .bind(&variable.key)
        .bind(&variable.name)
        .bind(variable.var_type.as_str())
        .bind(&variable.default_value)
        .bind(&variable.description)
        .bind(variable.required)
        .bind(variable.updated_at)
        .execute(&mut **tx)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(TemplateError::NotFound("Variable".to_string()));
        }
        Ok(())
    }

    async fn update_template_tx(
        tx: &mut Transaction<'_, Postgres>,
        template: &EmailTemplate,
    ) -> TemplateResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE email_templates
            SET name = $2, description = $3, body = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(template.id)
        .bind(&template.name)
        .bind(&template.description)
        .bind(&template.body)
        .bind(template.updated_at)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(template.id));
        }
        Ok(())
    }

    async fn upsert_preview_tx(
        tx: &mut Transaction<'_, Postgres>,
        preview: &PreviewDataset,
    ) -> TemplateResult<PreviewDataset> {
        let row: PreviewRow = sqlx::query_as(
            r#"
            INSERT INTO preview_datasets (id, template_id, name, data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            ON CONFLICT (template_id)
            DO UPDATE SET name = EXCLUDED.name, data = EXCLUDED.data, updated_at = NOW()
            RETURNING id, template_id, name, data, created_at, updated_at
            "#,
        )
        .bind(preview.id)
        .bind(preview.template_id)
        .bind(&preview.name)
        .bind(serde_json::Value::Object(preview.data.clone()))
        .fetch_one(&mut **tx)
        .await?;

        Ok(preview_from_row(row))
    }

    async fn load_details(&self, template: EmailTemplate) -> TemplateResult<TemplateDetails> {
        let variables = self.list_variables(template.id).await?;
        let preview = self.get_preview(template.id).await?;
        Ok(TemplateDetails {
            template,
            variables,
            preview,
        })
    }

    async fn get_settings(
        &self,
        table: &str,
        template_id: Uuid,
    ) -> TemplateResult<Option<serde_json::Value>> {
        self.ensure_template(template_id).await?;
        let settings: Option<serde_json::Value> = sqlx::query_scalar(&format!(
            "SELECT settings FROM {} WHERE template_id = $1",
            table
        ))
        .bind(template_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(settings)
    }

    async fn save_settings(
        &self,
        table: &str,
        template_id: Uuid,
        settings: serde_json::Value,
    ) -> TemplateResult<()> {
        self.ensure_template(template_id).await?;
        sqlx::query(&format!(
            r#"
            INSERT INTO {} (template_id, settings, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (template_id)
            DO UPDATE SET settings = EXCLUDED.settings, updated_at = NOW()
            "#,
            table
        ))
        .bind(template_id)
        .bind(settings)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl TemplateRepository for PostgresTemplateRepository {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn list(&self) -> TemplateResult<Vec<TemplateDetails>> {
        let rows: Vec<TemplateRow> = sqlx::query_as(&format!(
            "SELECT {} FROM email_templates ORDER BY created_at ASC",
            TEMPLATE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut templates = Vec::with_capacity(rows.len());
        for row in rows {
            templates.push(self.load_details(template_from_row(row)).await?);
        }
        Ok(templates)
    }

    async fn get(&self, id: Uuid) -> TemplateResult<TemplateDetails> {
        let row: Option<TemplateRow> = sqlx::query_as(&format!(
            "SELECT {} FROM email_templates WHERE id = $1",
            TEMPLATE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => self.load_details(template_from_row(row)).await,
            None => Err(not_found(id)),
        }
    }

    async fn count(&self) -> TemplateResult<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM email_templates")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }

    async fn insert(
        &self,
        template: EmailTemplate,
        variables: Vec<TemplateVariable>,
        preview: Option<PreviewDataset>,
    ) -> TemplateResult<TemplateDetails> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!(
            "INSERT INTO email_templates ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            TEMPLATE_COLUMNS
        ))
        .bind(template.id)
        .bind(&template.name)
        .bind(&template.description)
        .bind(&template.body)
        .bind(template.is_system)
        .bind(&template.user_id)
        .bind(&template.folder_id)
        .bind(template.created_at)
        .bind(template.updated_at)
        .execute(&mut *tx)
        .await?;

        for variable in &variables {
            Self::insert_variable_tx(&mut tx, variable).await?;
        }

        if let Some(preview) = &preview {
            Self::upsert_preview_tx(&mut tx, preview).await?;
        }

        tx.commit().await?;

        tracing::debug!(template_id = %template.id, "Template inserted into PostgreSQL");
        self.get(template.id).await
    }

    async fn update(
        &self,
        template: EmailTemplate,
        variables: Option<Vec<TemplateVariable>>,
    ) -> TemplateResult<TemplateDetails> {
        let mut tx = self.pool.begin().await?;

        Self::update_template_tx(&mut tx, &template).await?;

        if let Some(variables) = variables {
            sqlx::query("DELETE FROM template_variables WHERE template_id = $1")
                .bind(template.id)
                .execute(&mut *tx)
                .await?;
            for variable in &variables {
                Self::insert_variable_tx(&mut tx, variable).await?;
            }
        }

        tx.commit().await?;
        self.get(template.id).await
    }

    async fn delete(&self, id: Uuid) -> TemplateResult<()> {
        let result = sqlx::query("DELETE FROM email_templates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn list_variables(&self, template_id: Uuid) -> TemplateResult<Vec<TemplateVariable>> {
        self.ensure_template(template_id).await?;
        let rows: Vec<VariableRow> = sqlx::query_as(&format!(
            "SELECT {} FROM template_variables WHERE template_id = $1 ORDER BY key ASC",
            VARIABLE_COLUMNS
        ))
        .bind(template_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(variable_from_row).collect())
    }

    async fn insert_variable(&self, variable: TemplateVariable) -> TemplateResult<TemplateVariable> {
        self.ensure_template(variable.template_id).await?;
        let mut tx = self.pool.begin().await?;
        Self::insert_variable_tx(&mut tx, &variable).await?;
        tx.commit().await?;
        Ok(variable)
    }

    async fn update_variable(&self, variable: TemplateVariable) -> TemplateResult<TemplateVariable> {
        let mut tx = self.pool.begin().await?;
        Self::update_variable_tx(&mut tx, &variable).await?;
        tx.commit().await?;
        Ok(variable)
    }

    async fn delete_variable(&self, template_id: Uuid, variable_id: Uuid) -> TemplateResult<()> {
        let result =
            sqlx::query("DELETE FROM template_variables WHERE id = $1 AND template_id = $2")
                .bind(variable_id)
                .bind(template_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
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
        let mut tx = self.pool.begin().await?;

        Self::update_variable_tx(&mut tx, &variable).await?;
        Self::update_template_tx(&mut tx, &template).await?;
        if let Some(preview) = &preview {
            Self::upsert_preview_tx(&mut tx, preview).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn get_preview(&self, template_id: Uuid) -> TemplateResult<Option<PreviewDataset>> {
        let row: Option<PreviewRow> = sqlx::query_as(
            r#"
            SELECT id, template_id, name, data, created_at, updated_at
            FROM preview_datasets
            WHERE template_id = $1
            "#,
        )
        .bind(template_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(preview_from_row))
    }

    async fn save_preview(&self, preview: PreviewDataset) -> TemplateResult<PreviewDataset> {
        self.ensure_template(preview.template_id).await?;
        let mut tx = self.pool.begin().await?;
        let saved = Self::upsert_preview_tx(&mut tx, &preview).await?;
        tx.commit().await?;
        Ok(saved)
    }

    async fn get_background(&self, template_id: Uuid) -> TemplateResult<Option<BackgroundSettings>> {
        match self.get_settings("template_backgrounds", template_id).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn save_background(
        &self,
        template_id: Uuid,
        settings: BackgroundSettings,
    ) -> TemplateResult<BackgroundSettings> {
        self.save_settings(
            "template_backgrounds",
            template_id,
            serde_json::to_value(&settings)?,
        )
        .await?;
        Ok(settings)
    }

    async fn get_header_footer(
        &self,
        template_id: Uuid,
    ) -> TemplateResult<Option<HeaderFooterSettings>> {
        match self.get_settings("template_header_footers", template_id).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn save_header_footer(
        &self,
        template_id: Uuid,
        settings: HeaderFooterSettings,
    ) -> TemplateResult<HeaderFooterSettings> {
        self.save_settings(
            "template_header_footers",
            template_id,
            serde_json::to_value(&settings)?,
        )
        .await?;
        Ok(settings)
    }
}
