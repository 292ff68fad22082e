//! Auth service errors.

use sqlx::Error;
use thiserror::Error;

use crate::auth::SessionTokenError;

#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// The token is malformed, unknown, expired or revoked.
    #[error("session not found")]
    NotFound,

    #[error("session expiry is out of range")]
    InvalidExpiry,

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("token processing error")]
    Token(#[source] SessionTokenError),
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}

impl From<SessionTokenError> for AuthServiceError {
    fn from(error: SessionTokenError) -> Self {
        Self::Token(error)
    }
}
