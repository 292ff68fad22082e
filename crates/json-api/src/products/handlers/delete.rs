//! Delete Product Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use storefront_app::domain::products::records::ProductUuid;

use crate::{extensions::*, products::errors::into_status_error, state::State};

/// Delete Product Handler
#[endpoint(
    tags("products"),
    summary = "Delete Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product deleted"),
        (status_code = StatusCode::FORBIDDEN, description = "Caller may not manage products"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let scope = super::mutation_scope(depot.identity_or_401()?)?;

    state
        .app
        .products
        .delete_product(ProductUuid::from_uuid(product.into_inner()), scope)
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::OK)
}
