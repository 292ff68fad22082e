//! User Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*,
    state::State,
    users::{errors::into_status_error, models::UserResponse},
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UsersResponse {
    pub users: Vec<UserResponse>,
}

/// User Index Handler
///
/// Lists every user's public profile. Administrators only.
#[endpoint(
    tags("users"),
    summary = "List Users",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Users listed"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrator role required"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<UsersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.admin_or_403()?;

    let users = state
        .app
        .users
        .list_users()
        .await
        .map_err(into_status_error)?;

    Ok(Json(UsersResponse {
        users: users.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::users::records::{Role, UserStatus};

    use crate::test_helpers::{TestApp, identity, make_user};

    use super::*;

    fn make_service(app: TestApp, role: Role) -> Service {
        app.service(
            Some(identity("someone@example.com", role)),
            Router::with_path("users").get(handler),
        )
    }

    #[tokio::test]
    async fn test_admin_lists_public_profiles() -> TestResult {
        let mut app = TestApp::default();

        app.users.expect_list_users().once().return_once(|| {
            Ok(vec![
                make_user("ana@example.com", Role::Regular, UserStatus::Pending),
                make_user("bruno@example.com", Role::Premium, UserStatus::Active),
            ])
        });

        let mut res = TestClient::get("http://example.com/users")
            .send(&make_service(app, Role::Admin))
            .await;

        let body = res.take_string().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.contains("\"bruno@example.com\""), "body was {body}");
        assert!(body.contains("\"premium\""), "body was {body}");
        assert!(!body.contains("password"), "body was {body}");

        Ok(())
    }

    #[tokio::test]
    async fn test_non_admin_is_forbidden() -> TestResult {
        let mut app = TestApp::default();

        app.users.expect_list_users().never();

        let res = TestClient::get("http://example.com/users")
            .send(&make_service(app, Role::Premium))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
