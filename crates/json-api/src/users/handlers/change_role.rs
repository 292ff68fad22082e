//! Change User Role Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::users::records::{Role, UserUuid};

use crate::{
    extensions::*,
    state::State,
    users::{errors::into_status_error, models::UserResponse},
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ChangeRoleRequest {
    /// Either `regular` or `premium`
    pub role: String,
}

/// Change User Role Handler
///
/// Switches an active user between the regular and premium roles. Administrators only.
#[endpoint(
    tags("users"),
    summary = "Change User Role",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Role changed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Role not assignable or account inactive"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrator role required"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
    ),
)]
#[tracing::instrument(
    name = "users.change_role",
    skip(user, json, depot),
    fields(user_uuid = tracing::field::Empty, role = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    json: JsonBody<ChangeRoleRequest>,
    depot: &mut Depot,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.admin_or_403()?;

    let user = UserUuid::from_uuid(user.into_inner());
    let role = json
        .into_inner()
        .role
        .parse::<Role>()
        .map_err(|_unknown| StatusError::bad_request().brief("Unknown role"))?;

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user));
    span.record("role", role.as_str());

    let user = state
        .app
        .users
        .change_role(user, role)
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}
