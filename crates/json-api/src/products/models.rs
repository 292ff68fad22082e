//! Product Models

use std::string::ToString;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::products::records::ProductRecord;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    /// The unique identifier of the product
    pub uuid: Uuid,

    pub title: String,

    pub description: String,

    /// The price of the product in cents
    pub price: u64,

    /// Units available for purchase
    pub stock: u64,

    /// Email of the owning account, or "admin"
    pub owner: String,

    /// The date and time the product was created
    pub created_at: String,

    /// The date and time the product was last updated
    pub updated_at: String,

    /// The date and time the product was deleted
    pub deleted_at: Option<String>,
}

impl From<ProductRecord> for ProductResponse {
    fn from(product: ProductRecord) -> Self {
        ProductResponse {
            uuid: product.uuid.into_uuid(),
            title: product.title,
            description: product.description,
            price: product.price,
            stock: product.stock,
            owner: product.owner,
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
            deleted_at: product.deleted_at.as_ref().map(ToString::to_string),
        }
    }
}

/// Product details accepted on create and update
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductRequest {
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Unit price in cents
    pub price: u64,

    pub stock: u64,
}
