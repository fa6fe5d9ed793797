//! Catalog service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    catalog::{
        CatalogStore,
        errors::CatalogServiceError,
        models::{Category, ProductUuid},
    },
    enrichment::{self, views::ProductView},
};

#[derive(Clone)]
pub struct StoreCatalogService {
    store: Arc<dyn CatalogStore>,
}

impl StoreCatalogService {
    #[must_use]
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CatalogService for StoreCatalogService {
    async fn list_products(&self) -> Result<Vec<ProductView>, CatalogServiceError> {
        let products = self.store.list_products().await?;
        let categories = self.store.list_categories().await?;

        Ok(enrichment::enrich_product_list(products, &categories))
    }

    async fn get_product(&self, product: ProductUuid) -> Result<ProductView, CatalogServiceError> {
        let product = self
            .store
            .get_product(product)
            .await?
            .ok_or(CatalogServiceError::NotFound)?;

        let category = self.store.get_category(product.category_uuid).await?;

        Ok(enrichment::enrich_product(product, category.as_ref()))
    }

    async fn list_categories(&self) -> Result<Vec<Category>, CatalogServiceError> {
        Ok(self.store.list_categories().await?)
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Retrieves all products, each labelled with its category name.
    async fn list_products(&self) -> Result<Vec<ProductView>, CatalogServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductUuid) -> Result<ProductView, CatalogServiceError>;

    /// Retrieves all categories.
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogServiceError>;
}
