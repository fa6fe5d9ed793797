//! Model builders for unit tests.

use jiff::Timestamp;

use crate::domain::{
    carts::models::{CartItem, CartItemUuid, UserUuid},
    catalog::models::{Category, CategoryUuid, Product, ProductUuid},
};

pub(crate) fn make_category(name: &str) -> Category {
    Category {
        uuid: CategoryUuid::new(),
        name: name.to_string(),
    }
}

pub(crate) fn make_product(category: CategoryUuid, price: u64) -> Product {
    let uuid = ProductUuid::new();

    Product {
        uuid,
        category_uuid: category,
        name: format!("Product {uuid}"),
        description: String::new(),
        price,
        image_url: format!("/images/{uuid}.png"),
    }
}

/// A cart line for a fresh user.
pub(crate) fn make_cart_item(product: ProductUuid, quantity: u32) -> CartItem {
    let now = Timestamp::now();

    CartItem {
        uuid: CartItemUuid::new(),
        user_uuid: UserUuid::new(),
        product_uuid: product,
        quantity,
        created_at: now,
        updated_at: now,
    }
}
