//! Catalog Store

use async_trait::async_trait;
use mockall::automock;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query_as};

use crate::{
    database::Db,
    domain::catalog::models::{Category, CategoryUuid, Product, ProductUuid},
    store::{StoreError, try_get_unsigned},
};

const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const GET_CATEGORY_SQL: &str = include_str!("sql/get_category.sql");
const LIST_CATEGORIES_SQL: &str = include_str!("sql/list_categories.sql");

/// `PostgreSQL`-backed catalog store.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    db: Db,
}

impl PgCatalogStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn get_product(&self, product: ProductUuid) -> Result<Option<Product>, StoreError> {
        let product = query_as::<Postgres, Product>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_optional(self.db.pool())
            .await?;

        Ok(product)
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let products = query_as::<Postgres, Product>(LIST_PRODUCTS_SQL)
            .fetch_all(self.db.pool())
            .await?;

        Ok(products)
    }

    async fn get_category(&self, category: CategoryUuid) -> Result<Option<Category>, StoreError> {
        let category = query_as::<Postgres, Category>(GET_CATEGORY_SQL)
            .bind(category.into_uuid())
            .fetch_optional(self.db.pool())
            .await?;

        Ok(category)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let categories = query_as::<Postgres, Category>(LIST_CATEGORIES_SQL)
            .fetch_all(self.db.pool())
            .await?;

        Ok(categories)
    }
}

impl<'r> FromRow<'r, PgRow> for Product {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            category_uuid: CategoryUuid::from_uuid(row.try_get("category_uuid")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: try_get_unsigned::<i64, u64>(row, "price")?,
            image_url: row.try_get("image_url")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Category {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CategoryUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
        })
    }
}

/// Read access to products and their categories.
#[automock]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Look up a single product.
    async fn get_product(&self, product: ProductUuid) -> Result<Option<Product>, StoreError>;

    /// List every product.
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    /// Look up a single category.
    async fn get_category(&self, category: CategoryUuid) -> Result<Option<Category>, StoreError>;

    /// List every category.
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;
}
