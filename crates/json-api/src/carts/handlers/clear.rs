//! Clear Cart Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use storefront_app::domain::carts::records::CartUuid;

use crate::{
    carts::{errors::into_status_error, models::CartResponse},
    extensions::*,
    state::State,
};

/// Clear Cart Handler
///
/// Removes every line; the cart itself is kept.
#[endpoint(
    tags("carts"),
    summary = "Clear Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart cleared"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = state
        .app
        .carts
        .clear_cart(CartUuid::from_uuid(cart.into_inner()))
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
            Router::with_path("carts/{cart}").delete(handler),
        )
    }

    #[tokio::test]
    async fn test_clear_returns_empty_cart() -> TestResult {
        let cart = CartUuid::new();

        let mut app = TestApp::default();

        app.carts
            .expect_clear_cart()
            .once()
            .withf(move |c| *c == cart)
            .return_once(move |_| Ok(make_cart(cart, Vec::new())));

        let mut res = TestClient::delete(format!("http://example.com/carts/{cart}"))
            .send(&make_service(app))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.uuid, cart.into_uuid());
        assert!(body.products.is_empty(), "expected no lines");

        Ok(())
    }

    #[tokio::test]
    async fn test_clear_missing_cart_returns_404() -> TestResult {
        let mut app = TestApp::default();

        app.carts
            .expect_clear_cart()
            .once()
            .return_once(|_| Err(CartsServiceError::NotFound));

        let res = TestClient::delete(format!("http://example.com/carts/{}", CartUuid::new()))
            .send(&make_service(app))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
