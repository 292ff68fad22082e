//! Cart Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::{carts::CartsServiceError, checkout::CheckoutServiceError};

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::AlreadyExists => StatusError::conflict().brief("Cart already exists"),
        CartsServiceError::NotFound => StatusError::not_found().brief("Cart not found"),
        CartsServiceError::ProductNotFound => StatusError::not_found().brief("Product not found"),
        CartsServiceError::LineNotFound => {
            StatusError::not_found().brief("Product is not in the cart")
        }
        CartsServiceError::SelfPurchase => {
            StatusError::forbidden().brief("Premium users cannot add their own products")
        }
        CartsServiceError::InvalidQuantity => {
            StatusError::bad_request().brief("Quantity must be at least one")
        }
        CartsServiceError::DuplicateLine => {
            StatusError::bad_request().brief("Each product may appear only once")
        }
        CartsServiceError::InvalidReference => {
            StatusError::bad_request().brief("Cart refers to an unknown product")
        }
        CartsServiceError::MissingRequiredData | CartsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid cart payload")
        }
        CartsServiceError::Sql(source) => {
            error!("cart storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}

pub(crate) fn checkout_status_error(error: CheckoutServiceError) -> StatusError {
    match error {
        CheckoutServiceError::NotFound => StatusError::not_found().brief("Cart not found"),
        CheckoutServiceError::NoItemsProcessable => {
            StatusError::bad_request().brief("No items in the cart could be processed")
        }
        CheckoutServiceError::AmountOverflow => {
            StatusError::bad_request().brief("Purchase amount is out of range")
        }
        CheckoutServiceError::Sql(source) => {
            error!("checkout storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}
