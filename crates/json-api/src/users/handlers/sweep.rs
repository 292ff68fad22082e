//! Sweep Inactive Users Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::info;

use storefront_app::domain::users::sweep::{SweepNotification, SweepReport};

use crate::{
    extensions::*,
    observability::observe_sweep,
    state::State,
    users::errors::into_status_error,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct NotificationStatus {
    pub email: String,

    /// Whether the account-deleted notice was handed to the mail relay
    pub delivered: bool,

    pub error: Option<String>,
}

impl From<SweepNotification> for NotificationStatus {
    fn from(notification: SweepNotification) -> Self {
        NotificationStatus {
            email: notification.email,
            delivered: notification.delivered,
            error: notification.error,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SweepResponse {
    /// Number of accounts removed
    pub deleted: u64,

    pub notifications: Vec<NotificationStatus>,
}

impl From<SweepReport> for SweepResponse {
    fn from(report: SweepReport) -> Self {
        SweepResponse {
            deleted: report.deleted,
            notifications: report.notifications.into_iter().map(Into::into).collect(),
        }
    }
}

/// Sweep Inactive Users Handler
///
/// Notifies and deletes every account whose last connection is older than the inactivity
/// threshold. Administrators only.
#[endpoint(
    tags("users"),
    summary = "Delete Inactive Users",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Inactive users deleted"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrator role required"),
        (status_code = StatusCode::NOT_FOUND, description = "No inactive users"),
    ),
)]
#[tracing::instrument(name = "users.sweep", skip(depot), err)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<SweepResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.admin_or_403()?;

    let report = state
        .app
        .sweeper
        .sweep(Timestamp::now())
        .await
        .map_err(into_status_error)?;

    observe_sweep(report.deleted);

    if report.deleted == 0 {
        return Err(StatusError::not_found().brief("No inactive users to delete"));
    }

    info!(deleted = report.deleted, "swept inactive users");

    Ok(Json(report.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::users::records::Role;

    use crate::{
        errors::ErrorResponse,
        test_helpers::{TestApp, identity},
    };

    use super::*;

    fn make_service(app: TestApp, role: Role) -> Service {
        app.service(
            Some(identity("root@example.com", role)),
            Router::with_path("users").delete(handler),
        )
    }

    #[tokio::test]
    async fn test_sweep_reports_per_address_status() -> TestResult {
        let mut app = TestApp::default();

        app.sweeper.expect_sweep().once().return_once(|_| {
            Ok(SweepReport {
                notifications: vec![
                    SweepNotification {
                        email: "ana@example.com".to_string(),
                        delivered: true,
                        error: None,
                    },
                    SweepNotification {
                        email: "bruno@example.com".to_string(),
                        delivered: false,
                        error: Some("relay down".to_string()),
                    },
                ],
                deleted: 2,
            })
        });

        let mut res = TestClient::delete("http://example.com/users")
            .send(&make_service(app, Role::Admin))
            .await;

        let body: SweepResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.deleted, 2);

        let failed: Vec<_> = body
            .notifications
            .iter()
            .filter(|n| !n.delivered)
            .map(|n| n.email.as_str())
            .collect();

        assert_eq!(failed, vec!["bruno@example.com"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_nothing_to_delete_returns_404() -> TestResult {
        let mut app = TestApp::default();

        app.sweeper.expect_sweep().once().return_once(|_| {
            Ok(SweepReport {
                notifications: Vec::new(),
                deleted: 0,
            })
        });

        let mut res = TestClient::delete("http://example.com/users")
            .send(&make_service(app, Role::Admin))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert_eq!(body.error, "No inactive users to delete");

        Ok(())
    }

    #[tokio::test]
    async fn test_non_admin_is_forbidden() -> TestResult {
        let mut app = TestApp::default();

        app.sweeper.expect_sweep().never();

        let res = TestClient::delete("http://example.com/users")
            .send(&make_service(app, Role::Regular))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
