//! Enrichment
//!
//! Joins cart items and products against the catalog to produce the views
//! handed back to callers. Cart enrichment is fail-closed: a cart line whose
//! product cannot be resolved fails the whole call, because a cart with a
//! silently dropped line misstates its total. Product enrichment degrades
//! instead: a product with an unknown category is still listed, just without
//! a category label.

pub mod errors;
mod join;
pub mod views;

pub use errors::EnrichmentError;
pub use join::KeyedIndex;

use crate::domain::{
    carts::models::CartItem,
    catalog::models::{Category, Product},
    enrichment::views::{CartItemView, ProductView},
};

/// Label a single product with its category.
///
/// A category whose id does not match the product's is ignored.
#[must_use]
pub fn enrich_product(product: Product, category: Option<&Category>) -> ProductView {
    let category_name = category
        .filter(|category| category.uuid == product.category_uuid)
        .map(|category| category.name.clone());

    ProductView {
        uuid: product.uuid,
        category_uuid: product.category_uuid,
        category_name,
        name: product.name,
        description: product.description,
        image_url: product.image_url,
        price: product.price,
    }
}

/// Label every product with its category, preserving product order.
#[must_use]
pub fn enrich_product_list(products: Vec<Product>, categories: &[Category]) -> Vec<ProductView> {
    KeyedIndex::build(categories, |category| category.uuid)
        .join(products, |product| product.category_uuid, enrich_product)
        .collect()
}

/// Join one cart item with its product.
///
/// # Errors
///
/// Returns [`EnrichmentError::InconsistentReference`] when `product` is
/// missing or is not the product the item references, and
/// [`EnrichmentError::AmountOverflow`] when the line subtotal does not fit.
pub fn enrich_one(
    item: CartItem,
    product: Option<&ProductView>,
) -> Result<CartItemView, EnrichmentError> {
    let Some(product) = product.filter(|product| product.uuid == item.product_uuid) else {
        return Err(EnrichmentError::InconsistentReference {
            cart_item: item.uuid,
            product: item.product_uuid,
        });
    };

    let subtotal = product
        .price
        .checked_mul(u64::from(item.quantity))
        .ok_or(EnrichmentError::AmountOverflow)?;

    Ok(CartItemView {
        uuid: item.uuid,
        user_uuid: item.user_uuid,
        quantity: item.quantity,
        subtotal,
        product: product.clone(),
    })
}

/// Join every cart item with its product, preserving cart order.
///
/// # Errors
///
/// Fails on the first item that [`enrich_one`] rejects; no partial result is
/// returned.
pub fn enrich_many(
    items: Vec<CartItem>,
    products: &[ProductView],
) -> Result<Vec<CartItemView>, EnrichmentError> {
    KeyedIndex::build(products, |product| product.uuid)
        .join(items, |item| item.product_uuid, enrich_one)
        .collect()
}

/// Sum the subtotals of `items`.
///
/// # Errors
///
/// Returns [`EnrichmentError::AmountOverflow`] if the total does not fit.
pub fn cart_total(items: &[CartItemView]) -> Result<u64, EnrichmentError> {
    items.iter().try_fold(0_u64, |total, item| {
        total
            .checked_add(item.subtotal)
            .ok_or(EnrichmentError::AmountOverflow)
    })
}
