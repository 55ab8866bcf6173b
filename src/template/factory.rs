//! Template repository factory

use std::sync::Arc;

use crate::config::StorageConfig;
use crate::postgres::PostgresPool;

use super::memory_repository::MemoryTemplateRepository;
use super::postgres_repository::PostgresTemplateRepository;
use super::repository::TemplateRepository;

/// Create a template repository based on configuration.
///
/// - `"postgres"`: a `PostgresTemplateRepository` when a pool is provided
/// - `"memory"` (default): a `MemoryTemplateRepository`
pub fn create_template_repository(
    settings: &StorageConfig,
    postgres_pool: Option<&PostgresPool>,
) -> Arc<dyn TemplateRepository> {
    match settings.backend.as_str() {
        "postgres" => {
            if let Some(pool) = postgres_pool {
                tracing::info!(backend = "postgres", "Creating PostgreSQL template repository");
                Arc::new(PostgresTemplateRepository::new(pool.pool().clone()))
            } else {
                tracing::warn!(
                    "PostgreSQL backend requested but no pool provided, falling back to memory"
                );
                Arc::new(MemoryTemplateRepository::new())
            }
        }
        "memory" => {
            tracing::info!(backend = "memory", "Creating in-memory template repository");
            Arc::new(MemoryTemplateRepository::new())
        }
        other => {
            tracing::warn!(backend = %other, "Unknown storage backend, using memory");
            Arc::new(MemoryTemplateRepository::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend() {
        let repo = create_template_repository(&StorageConfig::default(), None);
        assert_eq!(repo.backend_name(), "memory");
    }

    #[test]
    fn test_postgres_without_pool_falls_back() {
        let config = StorageConfig {
            backend: "postgres".to_string(),
            seed_defaults: false,
        };
        let repo = create_template_repository(&config, None);
        assert_eq!(repo.backend_name(), "memory");
    }
}
