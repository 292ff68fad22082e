//! Add Product To Cart Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use storefront_app::domain::{carts::records::CartUuid, products::records::ProductUuid};

use crate::{
    carts::{errors::into_status_error, models::CartResponse},
    extensions::*,
    state::State,
};

/// Add Product To Cart Handler
///
/// Adds one unit of the product, appending a new line when the cart does not hold it yet.
#[endpoint(
    tags("carts"),
    summary = "Add Product to Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Product added"),
        (status_code = StatusCode::FORBIDDEN, description = "Premium users cannot add their own products"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart or product not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "carts.add_product",
    skip(cart, product, depot, res),
    fields(cart_uuid = tracing::field::Empty, product_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    product: PathParam<Uuid>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let caller = depot.identity_or_401()?;

    let cart = CartUuid::from_uuid(cart.into_inner());
    let product = ProductUuid::from_uuid(product.into_inner());

    let span = tracing::Span::current();

    span.record("cart_uuid", tracing::field::display(cart));
    span.record("product_uuid", tracing::field::display(product));

    let cart = state
        .app
        .carts
        .add_product(caller, cart, product)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(cart.into()))
}
