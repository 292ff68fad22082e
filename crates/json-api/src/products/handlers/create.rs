//! Create Product Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use storefront_app::domain::products::{
    data::{NewProduct, ProductScope},
    records::{ADMIN_OWNER, ProductUuid},
};

use crate::{
    extensions::*,
    products::{
        errors::into_status_error,
        models::{ProductRequest, ProductResponse},
    },
    state::State,
};

/// Create Product Handler
///
/// Premium users own what they create; administrators create products owned by "admin".
#[endpoint(
    tags("products"),
    summary = "Create Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::FORBIDDEN, description = "Caller may not create products"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "products.create",
    skip(json, depot, res),
    fields(owner = tracing::field::Empty, product_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<ProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let caller = depot.identity_or_401()?;

    let owner = match super::mutation_scope(caller)? {
        ProductScope::Any => ADMIN_OWNER.to_string(),
        ProductScope::OwnedBy(email) => email,
    };

    let request = json.into_inner();
    let uuid = ProductUuid::new();

    let span = tracing::Span::current();

    span.record("owner", tracing::field::display(&owner));
    span.record("product_uuid", tracing::field::display(uuid));

    let product = state
        .app
        .products
        .create_product(NewProduct {
            uuid,
            title: request.title,
            description: request.description,
            price: request.price,
            stock: request.stock,
            owner,
        })
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/api/products/{}", product.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(product.into()))
}
