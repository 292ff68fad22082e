//! Cart Data

use crate::domain::carts::records::CartUuid;

/// New Cart Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCart {
    pub uuid: CartUuid,
}
