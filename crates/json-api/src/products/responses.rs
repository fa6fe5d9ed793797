//! Catalog Responses

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::{catalog::models::Category, enrichment::views::ProductView};

/// Product Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    /// The unique identifier of the product
    pub uuid: Uuid,

    /// The product's display name
    pub name: String,

    /// The product's description
    pub description: String,

    /// Relative URL of the product image
    pub image_url: String,

    /// The unit price of the product in pence/cents
    pub price: u64,

    /// The unique identifier of the product's category
    pub category_uuid: Uuid,

    /// The category's name, absent when the category could not be resolved
    pub category_name: Option<String>,
}

impl From<ProductView> for ProductResponse {
    fn from(product: ProductView) -> Self {
        Self {
            uuid: product.uuid.into(),
            name: product.name,
            description: product.description,
            image_url: product.image_url,
            price: product.price,
            category_uuid: product.category_uuid.into(),
            category_name: product.category_name,
        }
    }
}

/// Category Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct CategoryResponse {
    /// The unique identifier of the category
    pub uuid: Uuid,

    /// The category's display name
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            uuid: category.uuid.into(),
            name: category.name,
        }
    }
}
