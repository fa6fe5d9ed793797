//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        carts::{CartsService, PgCartStore, StoreCartsService},
        catalog::{CatalogService, PgCatalogStore, StoreCatalogService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn CatalogService>,
    pub carts: Arc<dyn CartsService>,
}

impl AppContext {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogService>, carts: Arc<dyn CartsService>) -> Self {
        Self { catalog, carts }
    }

    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(url: &str, max_connections: u32) -> Result<Self, AppInitError> {
        let pool = database::connect(url, max_connections)
            .await
            .map_err(AppInitError::Database)?;

        Ok(Self::from_db(Db::new(pool)))
    }

    /// Wire the Postgres stores behind the services.
    #[must_use]
    pub fn from_db(db: Db) -> Self {
        let catalog_store = Arc::new(PgCatalogStore::new(db.clone()));
        let cart_store = Arc::new(PgCartStore::new(db));

        Self {
            catalog: Arc::new(StoreCatalogService::new(catalog_store.clone())),
            carts: Arc::new(StoreCartsService::new(cart_store, catalog_store)),
        }
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}
