//! Product Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub title: String,
    pub description: String,
    /// Unit price in minor currency units.
    pub price: u64,
    pub stock: u64,
    /// Email of the owning account, or [`ADMIN_OWNER`].
    pub owner: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Owner recorded for products created by administrators.
pub const ADMIN_OWNER: &str = "admin";

impl ProductRecord {
    /// Whether the current stock covers `quantity` units.
    #[must_use]
    pub fn covers(&self, quantity: u32) -> bool {
        self.stock >= u64::from(quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: u64) -> ProductRecord {
        ProductRecord {
            uuid: ProductUuid::new(),
            title: "Mate".to_string(),
            description: String::new(),
            price: 1_500,
            stock,
            owner: ADMIN_OWNER.to_string(),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
            deleted_at: None,
        }
    }

    #[test]
    fn covers_exact_and_smaller_quantities() {
        assert!(product(3).covers(3));
        assert!(product(3).covers(1));
        assert!(!product(3).covers(4));
        assert!(!product(0).covers(1));
    }
}
