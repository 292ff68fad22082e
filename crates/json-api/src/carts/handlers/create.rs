//! Create Cart Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, prelude::*};

use storefront_app::domain::carts::{data::NewCart, records::CartUuid};

use crate::{
    carts::{errors::into_status_error, models::CartResponse},
    extensions::*,
    state::State,
};

/// Create Cart Handler
///
/// Creates an empty cart.
#[endpoint(
    tags("carts"),
    summary = "Create Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Cart created"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = state
        .app
        .carts
        .create_cart(NewCart {
            uuid: CartUuid::new(),
        })
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/api/carts/{}", cart.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

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
            Router::with_path("carts").post(handler),
        )
    }

    #[tokio::test]
    async fn test_create_cart_returns_empty_cart() -> TestResult {
        let mut app = TestApp::default();

        app.carts
            .expect_create_cart()
            .once()
            .return_once(|new| Ok(make_cart(new.uuid, Vec::new())));

        let mut res = TestClient::post("http://example.com/carts")
            .send(&make_service(app))
            .await;

        let body: CartResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/api/carts/{}", body.uuid).as_str()));
        assert!(body.products.is_empty(), "new carts start empty");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_cart_conflict_returns_409() -> TestResult {
        let mut app = TestApp::default();

        app.carts
            .expect_create_cart()
            .once()
            .return_once(|_| Err(CartsServiceError::AlreadyExists));

        let res = TestClient::post("http://example.com/carts")
            .send(&make_service(app))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
