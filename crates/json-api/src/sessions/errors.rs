//! Session Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::auth::AuthServiceError;

pub(crate) fn into_status_error(error: AuthServiceError) -> StatusError {
    match error {
        AuthServiceError::NotFound => {
            StatusError::unauthorized().brief("Invalid or expired session token")
        }
        AuthServiceError::Sql(source) => {
            error!("session storage failure: {source}");

            StatusError::internal_server_error()
        }
        error @ (AuthServiceError::Token(_) | AuthServiceError::InvalidExpiry) => {
            error!("failed to issue session token: {error}");

            StatusError::internal_server_error()
        }
    }
}
