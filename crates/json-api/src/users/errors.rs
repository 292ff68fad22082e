//! User Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::users::UsersServiceError;

pub(crate) fn into_status_error(error: UsersServiceError) -> StatusError {
    match error {
        UsersServiceError::AlreadyExists => StatusError::conflict().brief("User already exists"),
        UsersServiceError::NotFound => StatusError::not_found().brief("User not found"),
        UsersServiceError::InvalidCredentials => {
            StatusError::unauthorized().brief("Invalid email or password")
        }
        UsersServiceError::InvalidRole => {
            StatusError::bad_request().brief("Only the regular and premium roles can be assigned")
        }
        UsersServiceError::InactiveAccount => {
            StatusError::bad_request().brief("Account has not uploaded the required documents")
        }
        UsersServiceError::InvalidReference
        | UsersServiceError::MissingRequiredData
        | UsersServiceError::InvalidData => StatusError::bad_request().brief("Invalid user payload"),
        UsersServiceError::PasswordHash => {
            error!("password hashing failed");

            StatusError::internal_server_error()
        }
        UsersServiceError::Sql(source) => {
            error!("user storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}
