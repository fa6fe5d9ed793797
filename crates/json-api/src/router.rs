//! App Router

use salvo::Router;

use crate::{carts, categories, products};

/// Every storefront route and the handler it dispatches to.
pub fn app_router() -> Router {
    Router::new()
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(Router::with_path("{product}").get(products::get::handler)),
        )
        .push(Router::with_path("categories").get(categories::index::handler))
        .push(
            Router::with_path("users/{user}/cart")
                .get(carts::get::handler)
                .push(Router::with_path("items").post(carts::items::create::handler)),
        )
        .push(
            Router::with_path("cart-items/{item}")
                .get(carts::items::get::handler)
                .patch(carts::items::update::handler)
                .delete(carts::items::delete::handler),
        )
}
