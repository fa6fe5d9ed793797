//! Cart Store

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query_as};

use crate::{
    database::Db,
    domain::{
        carts::models::{CartItem, CartItemUuid, UserUuid},
        catalog::models::ProductUuid,
    },
    store::{StoreError, try_get_unsigned},
};

const GET_CART_ITEM_SQL: &str = include_str!("sql/get_cart_item.sql");
const LIST_CART_ITEMS_SQL: &str = include_str!("sql/list_cart_items.sql");
const INSERT_CART_ITEM_SQL: &str = include_str!("sql/insert_cart_item.sql");
const UPDATE_CART_ITEM_QUANTITY_SQL: &str = include_str!("sql/update_cart_item_quantity.sql");
const DELETE_CART_ITEM_SQL: &str = include_str!("sql/delete_cart_item.sql");

/// `PostgreSQL`-backed cart store.
#[derive(Debug, Clone)]
pub struct PgCartStore {
    db: Db,
}

impl PgCartStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartStore for PgCartStore {
    async fn get_cart_item(&self, item: CartItemUuid) -> Result<Option<CartItem>, StoreError> {
        let item = query_as::<Postgres, CartItem>(GET_CART_ITEM_SQL)
            .bind(item.into_uuid())
            .fetch_optional(self.db.pool())
            .await?;

        Ok(item)
    }

    async fn list_cart_items(&self, user: UserUuid) -> Result<Vec<CartItem>, StoreError> {
        let items = query_as::<Postgres, CartItem>(LIST_CART_ITEMS_SQL)
            .bind(user.into_uuid())
            .fetch_all(self.db.pool())
            .await?;

        Ok(items)
    }

    async fn insert_cart_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartItem, StoreError> {
        let quantity = i32::try_from(quantity)?;

        let mut tx = self.db.begin_transaction().await?;

        let item = query_as::<Postgres, CartItem>(INSERT_CART_ITEM_SQL)
            .bind(CartItemUuid::new().into_uuid())
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .bind(quantity)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(item)
    }

    async fn update_quantity(
        &self,
        item: CartItemUuid,
        quantity: u32,
    ) -> Result<Option<CartItem>, StoreError> {
        let quantity = i32::try_from(quantity)?;

        let mut tx = self.db.begin_transaction().await?;

        let item = query_as::<Postgres, CartItem>(UPDATE_CART_ITEM_QUANTITY_SQL)
            .bind(item.into_uuid())
            .bind(quantity)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(item)
    }

    async fn delete_cart_item(&self, item: CartItemUuid) -> Result<Option<CartItem>, StoreError> {
        let mut tx = self.db.begin_transaction().await?;

        let item = query_as::<Postgres, CartItem>(DELETE_CART_ITEM_SQL)
            .bind(item.into_uuid())
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(item)
    }
}

impl<'r> FromRow<'r, PgRow> for CartItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartItemUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            quantity: try_get_unsigned::<i32, u32>(row, "quantity")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

/// Persistence for cart lines.
///
/// Each call is atomic on its own; callers composing several calls get no
/// isolation between them.
#[automock]
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Look up a single cart line.
    async fn get_cart_item(&self, item: CartItemUuid) -> Result<Option<CartItem>, StoreError>;

    /// List a user's cart lines, oldest first.
    async fn list_cart_items(&self, user: UserUuid) -> Result<Vec<CartItem>, StoreError>;

    /// Insert a new cart line with a store-assigned id.
    async fn insert_cart_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartItem, StoreError>;

    /// Replace a line's quantity, returning the updated line if it exists.
    async fn update_quantity(
        &self,
        item: CartItemUuid,
        quantity: u32,
    ) -> Result<Option<CartItem>, StoreError>;

    /// Remove a line, returning it as it was before removal if it existed.
    async fn delete_cart_item(&self, item: CartItemUuid) -> Result<Option<CartItem>, StoreError>;
}
