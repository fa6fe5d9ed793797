//! Carts service errors.

use thiserror::Error;

use crate::{
    domain::{
        carts::models::CartItemUuid, catalog::models::ProductUuid,
        enrichment::EnrichmentError,
    },
    store::StoreError,
};

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("cart item not found")]
    NotFound,

    #[error("product not found")]
    ProductNotFound,

    #[error("quantity must be between 1 and 2147483647")]
    InvalidQuantity,

    #[error("cart item {cart_item} references product {product} which could not be resolved")]
    InconsistentReference {
        cart_item: CartItemUuid,
        product: ProductUuid,
    },

    #[error("cart store unavailable")]
    StoreUnavailable(#[from] StoreError),
}

impl From<EnrichmentError> for CartsServiceError {
    fn from(error: EnrichmentError) -> Self {
        match error {
            EnrichmentError::InconsistentReference { cart_item, product } => {
                Self::InconsistentReference { cart_item, product }
            }
            EnrichmentError::AmountOverflow => Self::InvalidQuantity,
        }
    }
}
