//! Cart Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    carts::{errors::into_status_error, models::CartResponse},
    extensions::*,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartsResponse {
    pub carts: Vec<CartResponse>,
}

/// Cart Index Handler
///
/// Lists every cart. Administrators only.
#[endpoint(
    tags("carts"),
    summary = "List Carts",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Carts listed"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrator role required"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.admin_or_403()?;

    let carts = state
        .app
        .carts
        .list_carts()
        .await
        .map_err(into_status_error)?;

    Ok(Json(CartsResponse {
        carts: carts.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::{
        carts::records::{CartLineRecord, CartUuid},
        products::records::ProductUuid,
        users::records::Role,
    };

    use crate::{
        carts::models::CartLine,
        test_helpers::{TestApp, identity, make_cart},
    };

    use super::*;

    fn make_service(app: TestApp, role: Role) -> Service {
        app.service(
            Some(identity("someone@example.com", role)),
            Router::with_path("carts").get(handler),
        )
    }

    #[tokio::test]
    async fn test_admin_lists_carts_with_lines() -> TestResult {
        let product = ProductUuid::new();

        let mut app = TestApp::default();

        app.carts.expect_list_carts().once().return_once(move || {
            Ok(vec![
                make_cart(CartUuid::new(), Vec::new()),
                make_cart(
                    CartUuid::new(),
                    vec![CartLineRecord {
                        product_uuid: product,
                        quantity: 2,
                    }],
                ),
            ])
        });

        let body: CartsResponse = TestClient::get("http://example.com/carts")
            .send(&make_service(app, Role::Admin))
            .await
            .take_json()
            .await?;

        assert_eq!(body.carts.len(), 2, "expected both carts");
        assert_eq!(
            body.carts.last().map(|cart| cart.products.clone()),
            Some(vec![CartLine {
                product: product.into_uuid(),
                quantity: 2,
            }])
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_non_admin_is_forbidden() -> TestResult {
        let mut app = TestApp::default();

        app.carts.expect_list_carts().never();

        let res = TestClient::get("http://example.com/carts")
            .send(&make_service(app, Role::Premium))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
