use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::drafts::{create_draft_store, DraftStore, MemoryDraftStore};
use crate::postgres::{run_migrations, PostgresPool};
use crate::template::{
    create_template_repository, seed_defaults, MemoryTemplateRepository, TemplateRepository,
    TemplateService,
};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub templates: Arc<TemplateService>,
    pub drafts: Arc<dyn DraftStore>,
    pub postgres_pool: Option<PostgresPool>,
    pub start_time: Instant,
}

impl AppState {
    /// Connect the configured backends and seed system templates.
    pub async fn new(settings: Settings) -> anyhow::Result<Self> {
        let postgres_pool = if settings.storage.backend == "postgres" {
            let pool = PostgresPool::new(&settings.database).await?;
            if settings.database.run_migrations {
                run_migrations(pool.pool()).await?;
            }
            Some(pool)
        } else {
            None
        };

        let repository = create_template_repository(&settings.storage, postgres_pool.as_ref());
        if settings.storage.seed_defaults {
            seed_defaults(repository.as_ref()).await?;
        }

        let drafts = create_draft_store(&settings.drafts).await;

        let mut state = Self::with_backends(settings, repository, drafts);
        state.postgres_pool = postgres_pool;
        Ok(state)
    }

    /// Build state around already constructed backends.
    pub fn with_backends(
        settings: Settings,
        repository: Arc<dyn TemplateRepository>,
        drafts: Arc<dyn DraftStore>,
    ) -> Self {
        let templates = Arc::new(TemplateService::new(repository, settings.render.on_missing));

        Self {
            settings: Arc::new(settings),
            templates,
            drafts,
            postgres_pool: None,
            start_time: Instant::now(),
        }
    }

    /// Memory-only state, used by tests and local tooling.
    pub fn in_memory(settings: Settings) -> Self {
        Self::with_backends(
            settings,
            Arc::new(MemoryTemplateRepository::new()),
            Arc::new(MemoryDraftStore::new()),
        )
    }
}
