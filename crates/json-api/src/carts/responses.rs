//! Cart Responses

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::enrichment::views::{CartItemView, CartView};

use crate::products::responses::ProductResponse;

/// Cart Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The user who owns the cart
    pub user_uuid: Uuid,

    /// The lines in the cart, oldest first
    pub items: Vec<CartItemResponse>,

    /// Sum of every line's subtotal in pence/cents
    pub total: u64,
}

impl From<CartView> for CartResponse {
    fn from(cart: CartView) -> Self {
        Self {
            user_uuid: cart.user_uuid.into(),
            items: cart.items.into_iter().map(CartItemResponse::from).collect(),
            total: cart.total,
        }
    }
}

/// Cart Item Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    /// The unique identifier of the cart item
    pub uuid: Uuid,

    /// The user who owns the cart item
    pub user_uuid: Uuid,

    /// Number of units of the product
    pub quantity: u32,

    /// Quantity multiplied by unit price, in pence/cents
    pub subtotal: u64,

    /// The product in the cart item
    pub product: ProductResponse,
}

impl From<CartItemView> for CartItemResponse {
    fn from(item: CartItemView) -> Self {
        Self {
            uuid: item.uuid.into(),
            user_uuid: item.user_uuid.into(),
            quantity: item.quantity,
            subtotal: item.subtotal,
            product: item.product.into(),
        }
    }
}

/// Cart Item Quantity Updated Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemUpdatedResponse {
    /// Whether the line was removed because the quantity was zero or below
    pub deleted: bool,

    /// The line after the update, or as it was before removal
    pub item: CartItemResponse,
}
