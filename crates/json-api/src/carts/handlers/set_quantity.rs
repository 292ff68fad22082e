//! Set Cart Line Quantity Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::{carts::records::CartUuid, products::records::ProductUuid};

use crate::{
    carts::{errors::into_status_error, models::CartResponse},
    extensions::*,
    state::State,
};

/// Set Quantity Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SetQuantityRequest {
    /// New quantity, at least one
    pub quantity: u32,
}

/// Set Cart Line Quantity Handler
#[endpoint(
    tags("carts"),
    summary = "Set Cart Line Quantity",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Quantity updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart or line not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid quantity"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    product: PathParam<Uuid>,
    json: JsonBody<SetQuantityRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = state
        .app
        .carts
        .set_quantity(
            CartUuid::from_uuid(cart.into_inner()),
            ProductUuid::from_uuid(product.into_inner()),
            json.into_inner().quantity,
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
