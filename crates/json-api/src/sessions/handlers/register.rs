//! Register Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::Deserialize;
use zeroize::Zeroizing;

use storefront_app::domain::users::{data::NewUser, records::UserUuid};

use crate::{
    extensions::*,
    state::State,
    users::{errors::into_status_error, models::UserResponse},
};

#[derive(Deserialize, ToSchema)]
pub(crate) struct RegisterRequest {
    pub first_name: String,

    pub last_name: String,

    pub email: String,

    pub age: u32,

    pub password: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"**redacted**")
            .finish_non_exhaustive()
    }
}

/// Register Handler
///
/// Creates a pending regular account together with its empty cart.
#[endpoint(
    tags("sessions"),
    summary = "Register",
    responses(
        (status_code = StatusCode::CREATED, description = "Account created"),
        (status_code = StatusCode::CONFLICT, description = "Email already registered"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
#[tracing::instrument(
    name = "sessions.register",
    skip(json, depot, res),
    fields(user_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<RegisterRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let request = json.into_inner();
    let uuid = UserUuid::new();

    tracing::Span::current().record("user_uuid", tracing::field::display(uuid));

    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(StatusError::bad_request().brief("Email and password are required"));
    }

    let user = state
        .app
        .users
        .register(NewUser {
            uuid,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            age: request.age,
            password: Zeroizing::new(request.password),
        })
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/api/users/{}", user.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(user.into()))
}
