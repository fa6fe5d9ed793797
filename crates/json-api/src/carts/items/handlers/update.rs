//! Update Cart Item Quantity Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::carts::models::QuantityUpdate;

use crate::{
    carts::{errors::into_status_error, responses::CartItemUpdatedResponse},
    extensions::*,
    observability,
    state::State,
};

/// Update Cart Item Quantity Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCartItemRequest {
    /// New quantity; zero or below removes the line
    pub quantity: i64,
}

/// Update Cart Item Quantity Handler
#[endpoint(
    tags("carts"),
    summary = "Update Cart Item Quantity",
    responses(
        (status_code = StatusCode::OK, description = "Cart item updated or removed"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart item not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "cart_items.update",
    skip(item, json, depot),
    fields(
        cart_item_uuid = tracing::field::Empty,
        quantity = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    item: PathParam<Uuid>,
    json: JsonBody<UpdateCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartItemUpdatedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let item = item.into_inner();
    let quantity = json.into_inner().quantity;

    let span = tracing::Span::current();

    span.record("cart_item_uuid", tracing::field::display(item));
    span.record("quantity", quantity);

    let outcome = state
        .app
        .carts
        .update_quantity(item.into(), quantity)
        .await
        .map_err(into_status_error)?;

    observability::record_cart_mutation(&outcome);

    let response = match outcome {
        QuantityUpdate::Updated(view) => CartItemUpdatedResponse {
            deleted: false,
            item: view.into(),
        },
        QuantityUpdate::Deleted(view) => {
            tracing::info!(cart_item_uuid = %item, "removed cart item by quantity update");

            CartItemUpdatedResponse {
                deleted: true,
                item: view.into(),
            }
        }
    };

    Ok(Json(response))
}
