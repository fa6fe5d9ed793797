//! Test helpers.

use std::sync::Arc;

use salvo::{affix_state::inject, prelude::*};

use storefront_app::{
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            models::{CartItemUuid, UserUuid},
        },
        catalog::{
            MockCatalogService,
            models::{CategoryUuid, ProductUuid},
        },
        enrichment::views::{CartItemView, ProductView},
    },
};

use crate::state::State;

fn strict_catalog_mock() -> MockCatalogService {
    let mut catalog = MockCatalogService::new();

    catalog.expect_list_products().never();
    catalog.expect_get_product().never();
    catalog.expect_list_categories().never();

    catalog
}

fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_get_cart().never();
    carts.expect_get_item().never();
    carts.expect_add_item().never();
    carts.expect_update_quantity().never();
    carts.expect_remove_item().never();

    carts
}

fn state(catalog: MockCatalogService, carts: MockCartsService) -> Arc<State> {
    State::from_app_context(AppContext::new(Arc::new(catalog), Arc::new(carts)))
}

pub(crate) fn catalog_service(catalog: MockCatalogService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state(catalog, strict_carts_mock())))
            .push(route),
    )
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state(strict_catalog_mock(), carts)))
            .push(route),
    )
}

pub(crate) fn make_product_view(price: u64, category_name: Option<&str>) -> ProductView {
    let uuid = ProductUuid::new();

    ProductView {
        uuid,
        category_uuid: CategoryUuid::new(),
        category_name: category_name.map(str::to_string),
        name: format!("Product {uuid}"),
        description: "A product".to_string(),
        image_url: format!("/images/{uuid}.png"),
        price,
    }
}

pub(crate) fn make_item_view(user: UserUuid, quantity: u32, price: u64) -> CartItemView {
    CartItemView {
        uuid: CartItemUuid::new(),
        user_uuid: user,
        quantity,
        subtotal: u64::from(quantity) * price,
        product: make_product_view(price, Some("Kitchen")),
    }
}
