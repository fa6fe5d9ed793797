//! Delete Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    carts::{errors::into_status_error, responses::CartItemResponse},
    extensions::*,
    observability::{self, CartMutation},
    state::State,
};

/// Delete Cart Item Handler
///
/// Returns the line as it was immediately before removal.
#[endpoint(
    tags("carts"),
    summary = "Delete Cart Item",
    responses(
        (status_code = StatusCode::OK, description = "Cart item deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart item not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "cart_items.delete",
    skip(item, depot),
    fields(cart_item_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    item: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartItemResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let item = item.into_inner();

    tracing::Span::current().record("cart_item_uuid", tracing::field::display(item));

    let removed = state
        .app
        .carts
        .remove_item(item.into())
        .await
        .map_err(into_status_error)?;

    observability::record_cart_mutation(CartMutation::Removed);

    tracing::info!(cart_item_uuid = %item, "deleted cart item");

    Ok(Json(removed.into()))
}
