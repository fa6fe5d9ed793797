//! Cart mutation policy.
//!
//! Decides how adds, quantity changes and deletions map onto cart store
//! calls. Lines are tracked per (user, product): adding a product that is
//! already in the cart increments the existing line instead of inserting a
//! duplicate, and setting a quantity to zero or below removes the line.
//!
//! Merging and collapsing to a delete are read-then-write sequences over
//! separate store calls. Two identical requests racing for the same user can
//! lose an update; the policy neither retries nor hides that.

use std::sync::Arc;

use tracing::debug;

use crate::{
    domain::{
        carts::{
            CartStore,
            errors::CartsServiceError,
            models::{AddOutcome, CartItem, CartItemUuid, QuantityUpdate, UserUuid},
        },
        catalog::{CatalogStore, models::ProductUuid},
    },
    store::StoreError,
};

/// Largest quantity a single cart line can hold.
pub const MAX_QUANTITY: u32 = i32::MAX.unsigned_abs();

#[derive(Clone)]
pub struct CartPolicy {
    carts: Arc<dyn CartStore>,
    catalog: Arc<dyn CatalogStore>,
}

impl CartPolicy {
    #[must_use]
    pub fn new(carts: Arc<dyn CartStore>, catalog: Arc<dyn CatalogStore>) -> Self {
        Self { carts, catalog }
    }

    /// Add `quantity` of `product` to the user's cart.
    ///
    /// # Errors
    ///
    /// - [`CartsServiceError::InvalidQuantity`] when `quantity` is below 1, or
    ///   the resulting quantity would exceed [`MAX_QUANTITY`] or its subtotal
    ///   would not fit. Nothing is written in that case.
    /// - [`CartsServiceError::ProductNotFound`] when the product does not exist.
    /// - [`CartsServiceError::NotFound`] when the line being merged into is
    ///   removed concurrently.
    /// - [`CartsServiceError::StoreUnavailable`] when a store call fails.
    pub async fn add(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: i64,
    ) -> Result<AddOutcome<CartItem>, CartsServiceError> {
        let quantity = validate_quantity(quantity)?;

        let Some(price) = self
            .catalog
            .get_product(product)
            .await?
            .map(|product| product.price)
        else {
            return Err(CartsServiceError::ProductNotFound);
        };

        let existing = self
            .carts
            .list_cart_items(user)
            .await?
            .into_iter()
            .find(|item| item.product_uuid == product);

        if let Some(existing) = existing {
            let merged = existing
                .quantity
                .checked_add(quantity)
                .filter(|merged| *merged <= MAX_QUANTITY)
                .ok_or(CartsServiceError::InvalidQuantity)?;

            ensure_subtotal_fits(price, merged)?;

            debug!(
                cart_item = %existing.uuid,
                from = existing.quantity,
                to = merged,
                "merging into existing cart line"
            );

            let item = self
                .carts
                .update_quantity(existing.uuid, merged)
                .await?
                .ok_or(CartsServiceError::NotFound)?;

            return Ok(AddOutcome::Merged(item));
        }

        ensure_subtotal_fits(price, quantity)?;

        let item = self
            .carts
            .insert_cart_item(user, product, quantity)
            .await
            .map_err(|error| match error {
                StoreError::InvalidReference => CartsServiceError::ProductNotFound,
                other => other.into(),
            })?;

        Ok(AddOutcome::Inserted(item))
    }

    /// Replace a line's quantity, removing the line when `quantity` is zero or
    /// negative.
    ///
    /// # Errors
    ///
    /// - [`CartsServiceError::NotFound`] when the line does not exist.
    /// - [`CartsServiceError::InvalidQuantity`] when `quantity` exceeds
    ///   [`MAX_QUANTITY`] or the line subtotal would not fit.
    /// - [`CartsServiceError::InconsistentReference`] when the line's product
    ///   no longer exists.
    /// - [`CartsServiceError::StoreUnavailable`] when a store call fails.
    pub async fn update_quantity(
        &self,
        item: CartItemUuid,
        quantity: i64,
    ) -> Result<QuantityUpdate<CartItem>, CartsServiceError> {
        if quantity <= 0 {
            debug!(cart_item = %item, quantity, "non-positive quantity removes cart line");

            return self.delete(item).await.map(QuantityUpdate::Deleted);
        }

        let quantity = validate_quantity(quantity)?;
        let line = self.get(item).await?;

        let price = self
            .catalog
            .get_product(line.product_uuid)
            .await?
            .map(|product| product.price)
            .ok_or(CartsServiceError::InconsistentReference {
                cart_item: line.uuid,
                product: line.product_uuid,
            })?;

        ensure_subtotal_fits(price, quantity)?;

        self.carts
            .update_quantity(item, quantity)
            .await?
            .map(QuantityUpdate::Updated)
            .ok_or(CartsServiceError::NotFound)
    }

    /// Remove a line, returning it as it was immediately before removal.
    ///
    /// # Errors
    ///
    /// - [`CartsServiceError::NotFound`] when the line does not exist.
    /// - [`CartsServiceError::StoreUnavailable`] when the store call fails.
    pub async fn delete(&self, item: CartItemUuid) -> Result<CartItem, CartsServiceError> {
        self.carts
            .delete_cart_item(item)
            .await?
            .ok_or(CartsServiceError::NotFound)
    }

    /// All of a user's cart lines, oldest first. An empty cart is `Ok(vec![])`.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::StoreUnavailable`] when the store call fails.
    pub async fn list_by_user(&self, user: UserUuid) -> Result<Vec<CartItem>, CartsServiceError> {
        Ok(self.carts.list_cart_items(user).await?)
    }

    /// A single cart line.
    ///
    /// # Errors
    ///
    /// - [`CartsServiceError::NotFound`] when the line does not exist.
    /// - [`CartsServiceError::StoreUnavailable`] when the store call fails.
    pub async fn get(&self, item: CartItemUuid) -> Result<CartItem, CartsServiceError> {
        self.carts
            .get_cart_item(item)
            .await?
            .ok_or(CartsServiceError::NotFound)
    }
}

fn validate_quantity(requested: i64) -> Result<u32, CartsServiceError> {
    u32::try_from(requested)
        .ok()
        .filter(|quantity| (1..=MAX_QUANTITY).contains(quantity))
        .ok_or(CartsServiceError::InvalidQuantity)
}

/// Rejects a quantity whose line subtotal would not fit in a `u64`.
fn ensure_subtotal_fits(price: u64, quantity: u32) -> Result<(), CartsServiceError> {
    price
        .checked_mul(u64::from(quantity))
        .map(|_| ())
        .ok_or(CartsServiceError::InvalidQuantity)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use testresult::TestResult;

    use crate::{
        domain::{
            carts::MockCartStore,
            catalog::{MockCatalogStore, models::CategoryUuid},
        },
        test::{
            fixtures::{make_cart_item, make_product},
            memory::{InMemoryCartStore, InMemoryCatalogStore},
        },
    };

    use super::*;

    fn in_memory_policy(catalog: InMemoryCatalogStore) -> (CartPolicy, Arc<InMemoryCartStore>) {
        let carts = Arc::new(InMemoryCartStore::default());

        (CartPolicy::new(carts.clone(), Arc::new(catalog)), carts)
    }

    fn mocked_policy(carts: MockCartStore, catalog: MockCatalogStore) -> CartPolicy {
        CartPolicy::new(Arc::new(carts), Arc::new(catalog))
    }

    #[test]
    fn validate_quantity_bounds() {
        assert!(validate_quantity(0).is_err(), "zero is not a valid quantity");
        assert!(validate_quantity(-3).is_err(), "negatives are not valid");
        assert!(
            validate_quantity(i64::from(MAX_QUANTITY) + 1).is_err(),
            "quantities beyond storage range are not valid"
        );
        assert_eq!(validate_quantity(1).ok(), Some(1));
        assert_eq!(validate_quantity(i64::from(MAX_QUANTITY)).ok(), Some(MAX_QUANTITY));
    }

    #[tokio::test]
    async fn add_inserts_new_line() -> TestResult {
        let product = make_product(CategoryUuid::new(), 9_99);
        let (policy, carts) = in_memory_policy(InMemoryCatalogStore::with_products([product.clone()]));
        let user = UserUuid::new();

        let outcome = policy.add(user, product.uuid, 2).await?;

        assert!(!outcome.is_merged(), "first add should insert");

        let item = outcome.into_inner();

        assert_eq!(item.quantity, 2);
        assert_eq!(item.product_uuid, product.uuid);
        assert_eq!(carts.list_cart_items(user).await?, vec![item]);

        Ok(())
    }

    #[tokio::test]
    async fn repeated_adds_merge_into_one_line() -> TestResult {
        let product = make_product(CategoryUuid::new(), 9_99);
        let (policy, carts) = in_memory_policy(InMemoryCatalogStore::with_products([product.clone()]));
        let user = UserUuid::new();

        let first = policy.add(user, product.uuid, 2).await?.into_inner();
        let second = policy.add(user, product.uuid, 3).await?;

        assert!(second.is_merged(), "second add should merge");

        let second = second.into_inner();

        assert_eq!(second.uuid, first.uuid, "merge must reuse the existing row");
        assert_eq!(second.quantity, 5);
        assert_eq!(carts.list_cart_items(user).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn adds_for_different_users_do_not_merge() -> TestResult {
        let product = make_product(CategoryUuid::new(), 100);
        let (policy, _carts) = in_memory_policy(InMemoryCatalogStore::with_products([product.clone()]));

        let a = policy.add(UserUuid::new(), product.uuid, 1).await?;
        let b = policy.add(UserUuid::new(), product.uuid, 1).await?;

        assert!(!a.is_merged() && !b.is_merged(), "each user gets their own line");
        assert_ne!(a.into_inner().uuid, b.into_inner().uuid);

        Ok(())
    }

    #[tokio::test]
    async fn add_rejects_non_positive_quantity_before_touching_stores() {
        let mut carts = MockCartStore::new();
        let mut catalog = MockCatalogStore::new();

        catalog.expect_get_product().never();
        carts.expect_list_cart_items().never();
        carts.expect_insert_cart_item().never();

        let policy = mocked_policy(carts, catalog);

        for quantity in [0, -1] {
            let result = policy.add(UserUuid::new(), ProductUuid::new(), quantity).await;

            assert!(
                matches!(result, Err(CartsServiceError::InvalidQuantity)),
                "expected InvalidQuantity for {quantity}, got {result:?}"
            );
        }
    }

    #[tokio::test]
    async fn add_unknown_product_returns_product_not_found() {
        let (policy, _carts) = in_memory_policy(InMemoryCatalogStore::default());

        let result = policy.add(UserUuid::new(), ProductUuid::new(), 1).await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound)),
            "expected ProductNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn add_merge_overflow_is_invalid_quantity() -> TestResult {
        let product = make_product(CategoryUuid::new(), 1);
        let (policy, _carts) = in_memory_policy(InMemoryCatalogStore::with_products([product.clone()]));
        let user = UserUuid::new();

        policy.add(user, product.uuid, i64::from(MAX_QUANTITY)).await?;

        let result = policy.add(user, product.uuid, 1).await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_maps_foreign_key_violation_to_product_not_found() {
        let product = make_product(CategoryUuid::new(), 100);
        let product_uuid = product.uuid;

        let mut catalog = MockCatalogStore::new();
        let mut carts = MockCartStore::new();

        catalog
            .expect_get_product()
            .once()
            .return_once(move |_| Ok(Some(product)));

        carts
            .expect_list_cart_items()
            .once()
            .return_once(|_| Ok(Vec::new()));

        carts
            .expect_insert_cart_item()
            .once()
            .return_once(|_, _, _| Err(StoreError::InvalidReference));

        let result = mocked_policy(carts, catalog)
            .add(UserUuid::new(), product_uuid, 1)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound)),
            "expected ProductNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn add_merge_into_vanished_line_returns_not_found() {
        let product = make_product(CategoryUuid::new(), 100);
        let existing = make_cart_item(product.uuid, 1);
        let user = existing.user_uuid;
        let product_uuid = product.uuid;

        let mut catalog = MockCatalogStore::new();
        let mut carts = MockCartStore::new();

        catalog
            .expect_get_product()
            .once()
            .return_once(move |_| Ok(Some(product)));

        carts
            .expect_list_cart_items()
            .once()
            .return_once(move |_| Ok(vec![existing]));

        carts
            .expect_update_quantity()
            .once()
            .withf(|_, quantity| *quantity == 2)
            .return_once(|_, _| Ok(None));

        carts.expect_insert_cart_item().never();

        let result = mocked_policy(carts, catalog).add(user, product_uuid, 1).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn add_with_overflowing_subtotal_writes_nothing() -> TestResult {
        let product = make_product(CategoryUuid::new(), u64::MAX);
        let (policy, carts) = in_memory_policy(InMemoryCatalogStore::with_products([product.clone()]));
        let user = UserUuid::new();

        let result = policy.add(user, product.uuid, 2).await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );
        assert!(
            carts.list_cart_items(user).await?.is_empty(),
            "rejected add must not insert a line"
        );

        Ok(())
    }

    #[tokio::test]
    async fn merge_into_overflowing_subtotal_keeps_existing_line() -> TestResult {
        let product = make_product(CategoryUuid::new(), u64::MAX / 3);
        let (policy, carts) = in_memory_policy(InMemoryCatalogStore::with_products([product.clone()]));
        let user = UserUuid::new();

        let existing = policy.add(user, product.uuid, 2).await?.into_inner();
        let result = policy.add(user, product.uuid, 2).await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );
        assert_eq!(carts.list_cart_items(user).await?, vec![existing]);

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_with_overflowing_subtotal_keeps_line() -> TestResult {
        let product = make_product(CategoryUuid::new(), u64::MAX / 3);
        let (policy, carts) = in_memory_policy(InMemoryCatalogStore::with_products([product.clone()]));

        let item = policy.add(UserUuid::new(), product.uuid, 1).await?.into_inner();
        let result = policy.update_quantity(item.uuid, 4).await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );
        assert_eq!(carts.get_cart_item(item.uuid).await?, Some(item));

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_of_line_with_missing_product_writes_nothing() {
        let line = make_cart_item(ProductUuid::new(), 1);
        let (line_uuid, product_uuid) = (line.uuid, line.product_uuid);

        let mut carts = MockCartStore::new();
        let mut catalog = MockCatalogStore::new();

        carts
            .expect_get_cart_item()
            .once()
            .return_once(move |_| Ok(Some(line)));

        catalog
            .expect_get_product()
            .once()
            .return_once(|_| Ok(None));

        carts.expect_update_quantity().never();

        let result = mocked_policy(carts, catalog)
            .update_quantity(line_uuid, 3)
            .await;

        assert!(
            matches!(
                result,
                Err(CartsServiceError::InconsistentReference { cart_item, product })
                    if cart_item == line_uuid && product == product_uuid
            ),
            "expected InconsistentReference, got {result:?}"
        );
    }

    #[tokio::test]
    async fn update_quantity_replaces_quantity() -> TestResult {
        let product = make_product(CategoryUuid::new(), 100);
        let (policy, _carts) = in_memory_policy(InMemoryCatalogStore::with_products([product.clone()]));

        let item = policy.add(UserUuid::new(), product.uuid, 2).await?.into_inner();
        let updated = policy.update_quantity(item.uuid, 7).await?;

        assert!(!updated.is_deleted(), "positive quantity must update");
        assert_eq!(updated.into_inner().quantity, 7);

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_zero_deletes_row() -> TestResult {
        let product = make_product(CategoryUuid::new(), 100);
        let (policy, carts) = in_memory_policy(InMemoryCatalogStore::with_products([product.clone()]));

        let item = policy.add(UserUuid::new(), product.uuid, 2).await?.into_inner();
        let outcome = policy.update_quantity(item.uuid, 0).await?;

        assert_eq!(outcome, QuantityUpdate::Deleted(item.clone()));
        assert!(
            carts.get_cart_item(item.uuid).await?.is_none(),
            "row should be gone after a zero-quantity update"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_of_missing_item_returns_not_found() {
        let (policy, _carts) = in_memory_policy(InMemoryCatalogStore::default());

        for quantity in [3, 0] {
            let result = policy.update_quantity(CartItemUuid::new(), quantity).await;

            assert!(
                matches!(result, Err(CartsServiceError::NotFound)),
                "expected NotFound for quantity {quantity}, got {result:?}"
            );
        }
    }

    #[tokio::test]
    async fn delete_returns_removed_row() -> TestResult {
        let product = make_product(CategoryUuid::new(), 100);
        let (policy, carts) = in_memory_policy(InMemoryCatalogStore::with_products([product.clone()]));
        let user = UserUuid::new();

        let item = policy.add(user, product.uuid, 4).await?.into_inner();
        let deleted = policy.delete(item.uuid).await?;

        assert_eq!(deleted, item);
        assert!(carts.list_cart_items(user).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn delete_missing_item_returns_not_found() {
        let (policy, _carts) = in_memory_policy(InMemoryCatalogStore::default());

        let result = policy.delete(CartItemUuid::new()).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn delete_propagates_store_failure() {
        let mut carts = MockCartStore::new();

        carts
            .expect_delete_cart_item()
            .once()
            .return_once(|_| Err(StoreError::Sql(sqlx::Error::PoolTimedOut)));

        let result = mocked_policy(carts, MockCatalogStore::new())
            .delete(CartItemUuid::new())
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::StoreUnavailable(StoreError::Sql(_)))),
            "expected StoreUnavailable, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_by_user_of_empty_cart_is_empty() -> TestResult {
        let (policy, _carts) = in_memory_policy(InMemoryCatalogStore::default());

        assert!(policy.list_by_user(UserUuid::new()).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn list_by_user_keeps_insertion_order() -> TestResult {
        let a = make_product(CategoryUuid::new(), 100);
        let b = make_product(CategoryUuid::new(), 200);
        let (policy, _carts) = in_memory_policy(InMemoryCatalogStore::with_products([
            a.clone(),
            b.clone(),
        ]));
        let user = UserUuid::new();

        let first = policy.add(user, b.uuid, 1).await?.into_inner();
        let second = policy.add(user, a.uuid, 1).await?.into_inner();
        policy.add(user, b.uuid, 1).await?;

        let uuids: Vec<_> = policy
            .list_by_user(user)
            .await?
            .into_iter()
            .map(|item| item.uuid)
            .collect();

        assert_eq!(uuids, vec![first.uuid, second.uuid]);

        Ok(())
    }

    #[tokio::test]
    async fn get_missing_item_returns_not_found() {
        let (policy, _carts) = in_memory_policy(InMemoryCatalogStore::default());

        let result = policy.get(CartItemUuid::new()).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
