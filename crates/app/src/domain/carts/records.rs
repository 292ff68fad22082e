//! Cart Records

use jiff::Timestamp;

use crate::{
    domain::products::records::{ProductRecord, ProductUuid},
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

/// Cart Record
#[derive(Debug, Clone, PartialEq)]
pub struct CartRecord {
    pub uuid: CartUuid,
    /// Lines in insertion order.
    pub lines: Vec<CartLineRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Cart Line Record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLineRecord {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
}

/// Cart with each line's product resolved against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCart {
    pub uuid: CartUuid,
    pub lines: Vec<ResolvedCartLine>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Cart line with its current product, if the product still exists.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCartLine {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub product: Option<ProductRecord>,
}

impl ResolvedCartLine {
    #[must_use]
    pub fn line(&self) -> CartLineRecord {
        CartLineRecord {
            product_uuid: self.product_uuid,
            quantity: self.quantity,
        }
    }
}
