//! Replace Cart Lines Handler

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

use storefront_app::domain::carts::records::CartUuid;

use crate::{
    carts::{
        errors::into_status_error,
        models::{CartLine, CartResponse},
    },
    extensions::*,
    state::State,
};

/// Replace Cart Lines Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReplaceCartRequest {
    /// The complete new line list
    pub products: Vec<CartLine>,
}

/// Replace Cart Lines Handler
#[endpoint(
    tags("carts"),
    summary = "Replace Cart Lines",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart lines replaced"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid line list"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    json: JsonBody<ReplaceCartRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let lines = json
        .into_inner()
        .products
        .into_iter()
        .map(Into::into)
        .collect();

    let cart = state
        .app
        .carts
        .replace_lines(CartUuid::from_uuid(cart.into_inner()), lines)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
