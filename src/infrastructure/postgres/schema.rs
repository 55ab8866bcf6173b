//! Table definitions for the PostgreSQL template store.
//!
//! Every statement is idempotent so startup can run them unconditionally.

use sqlx::PgPool;

use super::PostgresPoolError;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS email_templates (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        body TEXT NOT NULL,
        is_system BOOLEAN NOT NULL DEFAULT FALSE,
        user_id TEXT,
        folder_id TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS template_variables (
        id UUID PRIMARY KEY,
        template_id UUID NOT NULL REFERENCES email_templates(id) ON DELETE CASCADE,
        key TEXT NOT NULL,
        name TEXT NOT NULL,
        var_type TEXT NOT NULL DEFAULT 'text',
        default_value TEXT,
        description TEXT,
        required BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        UNIQUE (template_id, key)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS preview_datasets (
        id UUID PRIMARY KEY,
        template_id UUID NOT NULL UNIQUE REFERENCES email_templates(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        data JSONB NOT NULL DEFAULT '{}'::jsonb,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS template_backgrounds (
        template_id UUID PRIMARY KEY REFERENCES email_templates(id) ON DELETE CASCADE,
        settings JSONB NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS template_header_footers (
        template_id UUID PRIMARY KEY REFERENCES email_templates(id) ON DELETE CASCADE,
        settings JSONB NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_email_templates_created_at ON email_templates (created_at)",
];

/// Create the template tables if they do not exist yet.
pub async fn run_migrations(pool: &PgPool) -> Result<(), PostgresPoolError> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| PostgresPoolError::Migration(e.to_string()))?;
    }

    tracing::info!(statements = SCHEMA.len(), "PostgreSQL schema ensured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_tables_cascade() {
        for table in [
            "template_variables",
            "preview_datasets",
            "template_backgrounds",
            "template_header_footers",
        ] {
            let statement = SCHEMA
                .iter()
                .find(|s| s.contains(&format!("CREATE TABLE IF NOT EXISTS {} ", table)))
                .unwrap();
            assert!(statement.contains("ON DELETE CASCADE"), "{}", table);
        }
    }

    #[test]
    fn test_statements_are_idempotent() {
        assert!(SCHEMA.iter().all(|s| s.contains("IF NOT EXISTS")));
    }
}
