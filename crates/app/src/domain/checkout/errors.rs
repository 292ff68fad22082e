//! Checkout service errors.

use sqlx::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckoutServiceError {
    #[error("cart not found")]
    NotFound,

    #[error("no items in the cart could be processed")]
    NoItemsProcessable,

    #[error("purchase amount is out of range")]
    AmountOverflow,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CheckoutServiceError {
    fn from(error: Error) -> Self {
        match error {
            Error::RowNotFound => Self::NotFound,
            error => Self::Sql(error),
        }
    }
}
