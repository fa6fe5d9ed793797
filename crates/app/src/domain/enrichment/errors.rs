//! Enrichment errors.

use thiserror::Error;

use crate::domain::{carts::models::CartItemUuid, catalog::models::ProductUuid};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnrichmentError {
    #[error("cart item {cart_item} references product {product} which could not be resolved")]
    InconsistentReference {
        cart_item: CartItemUuid,
        product: ProductUuid,
    },

    #[error("cart amount overflowed")]
    AmountOverflow,
}
