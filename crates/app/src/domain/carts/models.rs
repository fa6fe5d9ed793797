//! Cart Models

use jiff::Timestamp;

use crate::{domain::catalog::models::ProductUuid, uuids::TypedUuid};

/// Cart owner marker.
#[derive(Debug)]
pub struct User;

/// User UUID
pub type UserUuid = TypedUuid<User>;

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItem>;

/// CartItem Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub uuid: CartItemUuid,
    pub user_uuid: UserUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// NewCartItem Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    pub product_uuid: ProductUuid,
    /// Requested quantity; validated by the cart policy.
    pub quantity: i64,
}

/// Result of adding a product to a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome<T> {
    /// No line existed for the product, so one was inserted.
    Inserted(T),

    /// The product was already in the cart and its line was incremented.
    Merged(T),
}

impl<T> AddOutcome<T> {
    #[must_use]
    pub fn into_inner(self) -> T {
        match self {
            Self::Inserted(item) | Self::Merged(item) => item,
        }
    }

    #[must_use]
    pub fn is_merged(&self) -> bool {
        matches!(self, Self::Merged(_))
    }
}

/// Result of changing a cart line's quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityUpdate<T> {
    /// The line now holds the requested quantity.
    Updated(T),

    /// A non-positive quantity was requested, so the line was removed. Holds
    /// the line as it was immediately before removal.
    Deleted(T),
}

impl<T> QuantityUpdate<T> {
    #[must_use]
    pub fn into_inner(self) -> T {
        match self {
            Self::Updated(item) | Self::Deleted(item) => item,
        }
    }

    #[must_use]
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted(_))
    }
}
