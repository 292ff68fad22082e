//! Current Session Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    state::State,
    users::{errors::into_status_error, models::UserResponse},
};

/// Current Session Handler
///
/// Returns the caller's public profile.
#[endpoint(
    tags("sessions"),
    summary = "Current User",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Profile of the caller"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Authentication required"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let caller = depot.identity_or_401()?;

    let user = state
        .app
        .users
        .get_user(caller.user_uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::users::records::{Role, UserRecord, UserStatus};

    use crate::test_helpers::{TestApp, identity, make_user};

    use super::*;

    #[tokio::test]
    async fn test_current_returns_callers_profile() -> TestResult {
        let caller = identity("ana@example.com", Role::Premium);
        let user_uuid = caller.user_uuid;

        let mut app = TestApp::default();

        app.users
            .expect_get_user()
            .once()
            .withf(move |user| *user == user_uuid)
            .return_once(move |_| {
                Ok(UserRecord {
                    uuid: user_uuid,
                    ..make_user("ana@example.com", Role::Premium, UserStatus::Active)
                })
            });

        let service = app.service(
            Some(caller),
            Router::with_path("sessions/current").get(handler),
        );

        let mut res = TestClient::get("http://example.com/sessions/current")
            .send(&service)
            .await;

        let body: UserResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.uuid, user_uuid.into_uuid());
        assert_eq!(body.email, "ana@example.com");
        assert_eq!(body.role, "premium");

        Ok(())
    }

    #[tokio::test]
    async fn test_anonymous_caller_returns_401() -> TestResult {
        let mut app = TestApp::default();

        app.users.expect_get_user().never();

        let service = app.service(None, Router::with_path("sessions/current").get(handler));

        let res = TestClient::get("http://example.com/sessions/current")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
