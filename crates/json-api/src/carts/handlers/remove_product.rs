//! Remove Product From Cart Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use storefront_app::domain::{carts::records::CartUuid, products::records::ProductUuid};

use crate::{
    carts::{errors::into_status_error, models::CartResponse},
    extensions::*,
    state::State,
};

/// Remove Product From Cart Handler
///
/// Removing a product the cart does not hold leaves the cart unchanged.
#[endpoint(
    tags("carts"),
    summary = "Remove Product from Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Line removed"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = state
        .app
        .carts
        .remove_product(
            CartUuid::from_uuid(cart.into_inner()),
            ProductUuid::from_uuid(product.into_inner()),
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::{carts::CartsServiceError, users::records::Role};

    use crate::test_helpers::{TestApp, identity, make_cart};

    use super::*;

    fn make_service(app: TestApp) -> Service {
        app.service(
            Some(identity("ana@example.com", Role::Regular)),
            Router::with_path("carts/{cart}/products/{product}").delete(handler),
        )
    }

    #[tokio::test]
    async fn test_remove_returns_remaining_lines() -> TestResult {
        let cart = CartUuid::new();
        let product = ProductUuid::new();

        let mut app = TestApp::default();

        app.carts
            .expect_remove_product()
            .once()
            .withf(move |c, p| *c == cart && *p == product)
            .return_once(move |_, _| Ok(make_cart(cart, Vec::new())));

        let mut res = TestClient::delete(format!(
            "http://example.com/carts/{cart}/products/{product}"
        ))
        .send(&make_service(app))
        .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.products.is_empty(), "expected the line to be gone");

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_cart_returns_404() -> TestResult {
        let mut app = TestApp::default();

        app.carts
            .expect_remove_product()
            .once()
            .return_once(|_, _| Err(CartsServiceError::NotFound));

        let res = TestClient::delete(format!(
            "http://example.com/carts/{}/products/{}",
            CartUuid::new(),
            ProductUuid::new()
        ))
        .send(&make_service(app))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
