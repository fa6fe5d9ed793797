//! Carts service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::Span;

use crate::domain::{
    carts::{
        CartStore,
        errors::CartsServiceError,
        models::{AddOutcome, CartItem, CartItemUuid, NewCartItem, QuantityUpdate, UserUuid},
        policy::CartPolicy,
    },
    catalog::CatalogStore,
    enrichment::{
        self,
        views::{CartItemView, CartView},
    },
};

/// Carts service backed by the cart and catalog stores.
#[derive(Clone)]
pub struct StoreCartsService {
    policy: CartPolicy,
    catalog: Arc<dyn CatalogStore>,
}

impl StoreCartsService {
    #[must_use]
    pub fn new(carts: Arc<dyn CartStore>, catalog: Arc<dyn CatalogStore>) -> Self {
        Self {
            policy: CartPolicy::new(carts, catalog.clone()),
            catalog,
        }
    }

    async fn enrich(&self, item: CartItem) -> Result<CartItemView, CartsServiceError> {
        let product = match self.catalog.get_product(item.product_uuid).await? {
            Some(product) => {
                let category = self.catalog.get_category(product.category_uuid).await?;

                Some(enrichment::enrich_product(product, category.as_ref()))
            }
            None => None,
        };

        enrichment::enrich_one(item, product.as_ref()).map_err(CartsServiceError::from)
    }
}

#[async_trait]
impl CartsService for StoreCartsService {
    async fn get_cart(&self, user: UserUuid) -> Result<CartView, CartsServiceError> {
        let items = self.policy.list_by_user(user).await?;

        if items.is_empty() {
            return Ok(CartView {
                user_uuid: user,
                items: Vec::new(),
                total: 0,
            });
        }

        let products = self.catalog.list_products().await?;
        let categories = self.catalog.list_categories().await?;
        let products = enrichment::enrich_product_list(products, &categories);

        let items = enrichment::enrich_many(items, &products)?;

        let total = enrichment::cart_total(&items)?;

        Ok(CartView {
            user_uuid: user,
            items,
            total,
        })
    }

    async fn get_item(&self, item: CartItemUuid) -> Result<CartItemView, CartsServiceError> {
        let item = self.policy.get(item).await?;

        self.enrich(item).await
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, item),
        fields(
            user_uuid = %user,
            product_uuid = %item.product_uuid,
            merged = tracing::field::Empty
        ),
        err
    )]
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<AddOutcome<CartItemView>, CartsServiceError> {
        let outcome = self
            .policy
            .add(user, item.product_uuid, item.quantity)
            .await?;

        let merged = outcome.is_merged();

        Span::current().record("merged", merged);

        let view = self.enrich(outcome.into_inner()).await?;

        Ok(if merged {
            AddOutcome::Merged(view)
        } else {
            AddOutcome::Inserted(view)
        })
    }

    #[tracing::instrument(
        name = "carts.service.update_quantity",
        skip(self),
        fields(cart_item_uuid = %item),
        err
    )]
    async fn update_quantity(
        &self,
        item: CartItemUuid,
        quantity: i64,
    ) -> Result<QuantityUpdate<CartItemView>, CartsServiceError> {
        let outcome = self.policy.update_quantity(item, quantity).await?;

        let deleted = outcome.is_deleted();
        let view = self.enrich(outcome.into_inner()).await?;

        Ok(if deleted {
            QuantityUpdate::Deleted(view)
        } else {
            QuantityUpdate::Updated(view)
        })
    }

    #[tracing::instrument(
        name = "carts.service.remove_item",
        skip(self),
        fields(cart_item_uuid = %item),
        err
    )]
    async fn remove_item(&self, item: CartItemUuid) -> Result<CartItemView, CartsServiceError> {
        let removed = self.policy.delete(item).await?;

        self.enrich(removed).await
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve a user's whole cart, every line joined with its product.
    ///
    /// An empty cart is not an error.
    async fn get_cart(&self, user: UserUuid) -> Result<CartView, CartsServiceError>;

    /// Retrieve a single cart line.
    async fn get_item(&self, item: CartItemUuid) -> Result<CartItemView, CartsServiceError>;

    /// Add a product to a user's cart, merging into an existing line for the
    /// same product.
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<AddOutcome<CartItemView>, CartsServiceError>;

    /// Replace a line's quantity. Zero or below removes the line.
    async fn update_quantity(
        &self,
        item: CartItemUuid,
        quantity: i64,
    ) -> Result<QuantityUpdate<CartItemView>, CartsServiceError>;

    /// Remove a line, returning it as it was before removal.
    async fn remove_item(&self, item: CartItemUuid) -> Result<CartItemView, CartsServiceError>;
}
