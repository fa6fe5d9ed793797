//! Enriched Views

use crate::domain::{
    carts::models::{CartItemUuid, UserUuid},
    catalog::models::{CategoryUuid, ProductUuid},
};

/// A product labelled with its category name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductView {
    pub uuid: ProductUuid,
    pub category_uuid: CategoryUuid,
    /// `None` when the category could not be resolved.
    pub category_name: Option<String>,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub price: u64,
}

/// A cart line joined with the product it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub uuid: CartItemUuid,
    pub user_uuid: UserUuid,
    pub quantity: u32,
    /// `quantity × product.price`, in pence/cents.
    pub subtotal: u64,
    pub product: ProductView,
}

/// Every line of a user's cart and what they add up to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub user_uuid: UserUuid,
    pub items: Vec<CartItemView>,
    pub total: u64,
}
