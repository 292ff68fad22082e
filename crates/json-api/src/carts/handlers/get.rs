//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use storefront_app::domain::carts::records::CartUuid;

use crate::{
    carts::{errors::into_status_error, models::ResolvedCartResponse},
    extensions::*,
    state::State,
};

/// Get Cart Handler
///
/// Returns the cart with each line's current product data.
#[endpoint(
    tags("carts"),
    summary = "Get Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart found"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ResolvedCartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = state
        .app
        .carts
        .get_cart(CartUuid::from_uuid(cart.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
