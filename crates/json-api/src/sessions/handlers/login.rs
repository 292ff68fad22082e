//! Login Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::{extensions::*, sessions::errors, state::State, users};

#[derive(Deserialize, ToSchema)]
pub(crate) struct LoginRequest {
    pub email: String,

    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"**redacted**")
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoginResponse {
    /// Bearer token; shown only once
    pub token: String,

    pub expires_at: String,
}

/// Login Handler
///
/// Checks credentials, records the connection and starts a session.
#[endpoint(
    tags("sessions"),
    summary = "Log In",
    responses(
        (status_code = StatusCode::OK, description = "Session started"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid email or password"),
    ),
)]
#[tracing::instrument(
    name = "sessions.login",
    skip(json, depot),
    fields(user_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<LoginRequest>,
    depot: &mut Depot,
) -> Result<Json<LoginResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let request = json.into_inner();
    let now = Timestamp::now();

    let user = state
        .app
        .users
        .authenticate(&request.email, Zeroizing::new(request.password), now)
        .await
        .map_err(users::errors::into_status_error)?;

    tracing::Span::current().record("user_uuid", tracing::field::display(user.uuid));

    let session = state
        .app
        .auth
        .issue_session(user.uuid, now)
        .await
        .map_err(errors::into_status_error)?;

    Ok(Json(LoginResponse {
        token: session.token,
        expires_at: session.metadata.expires_at.to_string(),
    }))
}
