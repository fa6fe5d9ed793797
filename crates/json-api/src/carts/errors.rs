//! Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::carts::CartsServiceError;

use crate::observability;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::NotFound => StatusError::not_found().brief("Cart item not found"),
        CartsServiceError::ProductNotFound => {
            StatusError::bad_request().brief("Product does not exist")
        }
        CartsServiceError::InvalidQuantity => {
            StatusError::bad_request().brief("Quantity must be between 1 and 2147483647")
        }
        CartsServiceError::InconsistentReference { cart_item, product } => {
            observability::record_inconsistent_reference();

            error!(%cart_item, %product, "cart item references a product that could not be resolved");

            StatusError::internal_server_error()
        }
        CartsServiceError::StoreUnavailable(source) => {
            error!("cart store unavailable: {source}");

            StatusError::internal_server_error()
        }
    }
}
