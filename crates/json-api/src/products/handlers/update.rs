//! Update Product Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use storefront_app::domain::products::{data::ProductUpdate, records::ProductUuid};

use crate::{
    extensions::*,
    products::{
        errors::into_status_error,
        models::{ProductRequest, ProductResponse},
    },
    state::State,
};

impl From<ProductRequest> for ProductUpdate {
    fn from(request: ProductRequest) -> Self {
        ProductUpdate {
            title: request.title,
            description: request.description,
            price: request.price,
            stock: request.stock,
        }
    }
}

/// Product Update Handler
///
/// Premium users may only update their own products.
#[endpoint(
    tags("products"),
    summary = "Update Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
        (status_code = StatusCode::FORBIDDEN, description = "Caller may not manage products"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "products.update",
    skip(product, json, depot),
    fields(
        product_uuid = tracing::field::Empty,
        price = tracing::field::Empty,
        stock = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<ProductRequest>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let scope = super::mutation_scope(depot.identity_or_401()?)?;
    let request = json.into_inner();
    let product = ProductUuid::from_uuid(product.into_inner());

    let span = tracing::Span::current();

    span.record("product_uuid", tracing::field::display(product));
    span.record("price", request.price);
    span.record("stock", request.stock);

    let product = state
        .app
        .products
        .update_product(product, request.into(), scope)
        .await
        .map_err(into_status_error)?;

    Ok(Json(product.into()))
}
