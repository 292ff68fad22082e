//! Products Data

use crate::domain::products::records::ProductUuid;

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub title: String,
    pub description: String,
    pub price: u64,
    pub stock: u64,
    pub owner: String,
}

/// Product Update Data
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub title: String,
    pub description: String,
    pub price: u64,
    pub stock: u64,
}

/// Which products a caller may modify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductScope {
    /// Any product (administrators).
    Any,

    /// Only products owned by the given account email.
    OwnedBy(String),
}

impl ProductScope {
    pub(crate) fn owner(&self) -> Option<&str> {
        match self {
            Self::Any => None,
            Self::OwnedBy(owner) => Some(owner),
        }
    }
}
