//! Add User Documents Handler

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

use storefront_app::domain::users::{data::NewDocument, records::UserUuid};

use crate::{
    extensions::*,
    state::State,
    users::{errors::into_status_error, models::UserResponse},
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UploadedDocument {
    /// Uploaded file name, e.g. `identification.pdf`
    pub filename: String,

    /// Where the file server stored the upload
    pub reference: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddDocumentsRequest {
    pub documents: Vec<UploadedDocument>,
}

/// Add User Documents Handler
///
/// Records uploaded documents against a user. The account becomes active once it holds an
/// identification, a proof of address and an account statement.
#[endpoint(
    tags("users"),
    summary = "Add User Documents",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Documents recorded"),
        (status_code = StatusCode::BAD_REQUEST, description = "No documents given"),
        (status_code = StatusCode::FORBIDDEN, description = "Not the caller's account"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
    ),
)]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    json: JsonBody<AddDocumentsRequest>,
    depot: &mut Depot,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let caller = depot.identity_or_401()?;

    let user = UserUuid::from_uuid(user.into_inner());

    if caller.user_uuid != user && !caller.is_admin() {
        return Err(StatusError::forbidden().brief("Documents can only be added to your own account"));
    }

    let documents: Vec<NewDocument> = json
        .into_inner()
        .documents
        .into_iter()
        .map(|document| NewDocument {
            filename: document.filename,
            reference: document.reference,
        })
        .collect();

    if documents.is_empty() {
        return Err(StatusError::bad_request().brief("No documents given"));
    }

    let user = state
        .app
        .users
        .add_documents(user, documents)
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}
