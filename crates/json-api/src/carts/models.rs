//! Cart Models

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::{
    carts::records::{CartLineRecord, CartRecord, ResolvedCart, ResolvedCartLine},
    checkout::records::PurchaseOutcome,
    products::records::ProductUuid,
};

use crate::{products::models::ProductResponse, tickets::models::TicketResponse};

/// One product and its quantity in a cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartLine {
    /// Product UUID
    pub product: Uuid,

    /// Units of the product, at least one
    pub quantity: u32,
}

impl From<CartLineRecord> for CartLine {
    fn from(line: CartLineRecord) -> Self {
        CartLine {
            product: line.product_uuid.into_uuid(),
            quantity: line.quantity,
        }
    }
}

impl From<CartLine> for CartLineRecord {
    fn from(line: CartLine) -> Self {
        CartLineRecord {
            product_uuid: ProductUuid::from_uuid(line.product),
            quantity: line.quantity,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// Cart UUID
    pub uuid: Uuid,

    /// Lines in the order they were added
    pub products: Vec<CartLine>,

    pub created_at: String,

    pub updated_at: String,
}

impl From<CartRecord> for CartResponse {
    fn from(cart: CartRecord) -> Self {
        CartResponse {
            uuid: cart.uuid.into_uuid(),
            products: cart.lines.into_iter().map(Into::into).collect(),
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// A cart line with the current product data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ResolvedCartLineResponse {
    /// Product UUID
    pub product: Uuid,

    pub quantity: u32,

    /// Current product data; absent once the product has been deleted
    pub details: Option<ProductResponse>,
}

impl From<ResolvedCartLine> for ResolvedCartLineResponse {
    fn from(line: ResolvedCartLine) -> Self {
        ResolvedCartLineResponse {
            product: line.product_uuid.into_uuid(),
            quantity: line.quantity,
            details: line.product.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ResolvedCartResponse {
    pub uuid: Uuid,

    pub products: Vec<ResolvedCartLineResponse>,

    pub created_at: String,

    pub updated_at: String,
}

impl From<ResolvedCart> for ResolvedCartResponse {
    fn from(cart: ResolvedCart) -> Self {
        ResolvedCartResponse {
            uuid: cart.uuid.into_uuid(),
            products: cart.lines.into_iter().map(Into::into).collect(),
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// Purchase summary
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PurchaseResponse {
    /// Lines bought, with product data as of the purchase
    pub purchased_products: Vec<ResolvedCartLineResponse>,

    /// Lines left in the cart
    pub unprocessed_products: Vec<ResolvedCartLineResponse>,

    pub ticket: TicketResponse,
}

impl From<PurchaseOutcome> for PurchaseResponse {
    fn from(outcome: PurchaseOutcome) -> Self {
        PurchaseResponse {
            purchased_products: outcome.purchased.into_iter().map(Into::into).collect(),
            unprocessed_products: outcome.unprocessed.into_iter().map(Into::into).collect(),
            ticket: outcome.ticket.into(),
        }
    }
}
