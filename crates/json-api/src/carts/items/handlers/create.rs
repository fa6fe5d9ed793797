//! Create Cart Item Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::carts::models::{AddOutcome, NewCartItem};

use crate::{
    carts::{errors::into_status_error, responses::CartItemResponse},
    extensions::*,
    observability,
    state::State,
};

/// Create Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateCartItemRequest {
    /// The product to add
    pub product_uuid: Uuid,

    /// Units to add; must be at least 1
    pub quantity: i64,
}

impl From<CreateCartItemRequest> for NewCartItem {
    fn from(request: CreateCartItemRequest) -> Self {
        NewCartItem {
            product_uuid: request.product_uuid.into(),
            quantity: request.quantity,
        }
    }
}

/// Create Cart Item Handler
///
/// Adding a product that is already in the cart increments the existing line
/// and answers 200 instead of 201.
#[endpoint(
    tags("carts"),
    summary = "Add Item to Cart",
    responses(
        (status_code = StatusCode::CREATED, description = "Cart item created"),
        (status_code = StatusCode::OK, description = "Existing cart item incremented"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid quantity or unknown product"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart item removed concurrently"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "cart_items.create",
    skip(user, json, depot, res),
    fields(
        user_uuid = tracing::field::Empty,
        cart_item_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    json: JsonBody<CreateCartItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartItemResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = user.into_inner();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user));

    let outcome = state
        .app
        .carts
        .add_item(user.into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    observability::record_cart_mutation(&outcome);

    let item = match outcome {
        AddOutcome::Inserted(item) => {
            res.add_header(LOCATION, format!("/cart-items/{}", item.uuid), true)
                .or_500("failed to set location header")?
                .status_code(StatusCode::CREATED);

            item
        }
        AddOutcome::Merged(item) => {
            res.status_code(StatusCode::OK);

            item
        }
    };

    span.record("cart_item_uuid", tracing::field::display(item.uuid));

    tracing::info!(cart_item_uuid = %item.uuid, quantity = item.quantity, "added item to cart");

    Ok(Json(item.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::carts::{
        CartsServiceError, MockCartsService, models::UserUuid,
    };

    use crate::test_helpers::{carts_service, make_item_view};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("users/{user}/cart/items").post(handler))
    }

    #[tokio::test]
    async fn new_line_returns_201_with_location() -> TestResult {
        let user = UserUuid::new();
        let item = make_item_view(user, 2, 9_99);
        let product = item.product.uuid;
        let item_uuid = item.uuid;

        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .withf(move |u, new| {
                *u == user
                    && *new
                        == NewCartItem {
                            product_uuid: product,
                            quantity: 2,
                        }
            })
            .return_once(move |_, _| Ok(AddOutcome::Inserted(item)));

        let mut res = TestClient::post(format!("http://example.com/users/{user}/cart/items"))
            .json(&json!({ "product_uuid": product.into_uuid(), "quantity": 2 }))
            .send(&make_service(carts))
            .await;

        let body: CartItemResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/cart-items/{item_uuid}").as_str()));
        assert_eq!(body.uuid, item_uuid.into_uuid());
        assert_eq!(body.subtotal, 19_98);

        Ok(())
    }

    #[tokio::test]
    async fn merged_line_returns_200() -> TestResult {
        let user = UserUuid::new();
        let item = make_item_view(user, 5, 9_99);
        let product = item.product.uuid;

        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .return_once(move |_, _| Ok(AddOutcome::Merged(item)));

        let mut res = TestClient::post(format!("http://example.com/users/{user}/cart/items"))
            .json(&json!({ "product_uuid": product.into_uuid(), "quantity": 3 }))
            .send(&make_service(carts))
            .await;

        let body: CartItemResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(
            res.headers().get("location").is_none(),
            "merge should not set a location"
        );
        assert_eq!(body.quantity, 5);
        assert_eq!(body.subtotal, 49_95);

        Ok(())
    }

    #[tokio::test]
    async fn invalid_quantity_returns_400() {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::InvalidQuantity));

        let res = TestClient::post(format!(
            "http://example.com/users/{}/cart/items",
            Uuid::now_v7()
        ))
        .json(&json!({ "product_uuid": Uuid::now_v7(), "quantity": 0 }))
        .send(&make_service(carts))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn unknown_product_returns_400() {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::ProductNotFound));

        let res = TestClient::post(format!(
            "http://example.com/users/{}/cart/items",
            Uuid::now_v7()
        ))
        .json(&json!({ "product_uuid": Uuid::now_v7(), "quantity": 1 }))
        .send(&make_service(carts))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn malformed_body_returns_400() {
        let mut carts = MockCartsService::new();

        carts.expect_add_item().never();

        let res = TestClient::post(format!(
            "http://example.com/users/{}/cart/items",
            Uuid::now_v7()
        ))
        .json(&json!({ "product_uuid": "nope", "quantity": "two" }))
        .send(&make_service(carts))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
