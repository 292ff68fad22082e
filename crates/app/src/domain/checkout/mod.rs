//! Checkout

pub mod errors;
pub mod records;
pub(crate) mod reconcile;
pub mod service;

pub use errors::CheckoutServiceError;
pub use service::*;
