use std::sync::Arc;

use crate::{
    config::{AppConfig, Persistence},
    db::{create_orm_conn, run_migrations},
    services::{MemoryProducts, OrmProducts, ProductManager, ProductStore},
};

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductStore>,
    pub manager: Arc<dyn ProductManager>,
    pub conventional_status_codes: bool,
}

impl AppState {
    pub fn new(products: Arc<dyn ProductStore>, manager: Arc<dyn ProductManager>) -> Self {
        Self {
            products,
            manager,
            conventional_status_codes: false,
        }
    }

    /// State whose store and manager share one in-memory catalogue.
    pub fn in_memory(catalogue: MemoryProducts) -> Self {
        let catalogue = Arc::new(catalogue);
        Self::new(catalogue.clone(), catalogue)
    }

    pub fn with_conventional_status_codes(mut self, enabled: bool) -> Self {
        self.conventional_status_codes = enabled;
        self
    }

    /// Builds the backend selected by `config`, connecting and migrating when
    /// it is Postgres.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let state = match config.persistence {
            Persistence::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is not set"))?;
                let orm = create_orm_conn(url).await?;
                run_migrations(&orm).await?;
                let backend = Arc::new(OrmProducts::new(orm));
                Self::new(backend.clone(), backend)
            }
            Persistence::Memory => Self::in_memory(MemoryProducts::new()),
        };
        tracing::info!(persistence = ?config.persistence, "product backend ready");
        Ok(state.with_conventional_status_codes(config.conventional_status_codes))
    }
}
