//! Logout Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::prelude::*;
use tracing::warn;

use crate::{
    auth::extract_bearer_token,
    extensions::*,
    sessions::errors::into_status_error,
    state::State,
};

/// Logout Handler
///
/// Revokes the session behind the bearer token and records the connection.
#[endpoint(
    tags("sessions"),
    summary = "Log Out",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Session revoked"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid or expired session token"),
    ),
)]
pub(crate) async fn handler(req: &mut Request, depot: &mut Depot) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let token = extract_bearer_token(req)
        .ok_or_else(|| StatusError::unauthorized().brief("Missing or invalid Authorization header"))?;

    let identity = state
        .app
        .auth
        .revoke_bearer(token)
        .await
        .map_err(into_status_error)?;

    if let Err(error) = state
        .app
        .users
        .record_connection(identity.user_uuid, Timestamp::now())
        .await
    {
        warn!(user = %identity.user_uuid, "failed to record last connection: {error}");
    }

    Ok(StatusCode::OK)
}
