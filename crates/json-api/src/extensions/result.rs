//! Result helpers for handlers.

use std::fmt::Display;

use salvo::prelude::StatusError;
use tracing::error;

pub(crate) trait ResultExt<T> {
    /// Log the failure under `context` and answer with a bare 500.
    fn or_500(self, context: &'static str) -> Result<T, StatusError>;
}

impl<T, E: Display> ResultExt<T> for Result<T, E> {
    fn or_500(self, context: &'static str) -> Result<T, StatusError> {
        self.map_err(|source| {
            error!(context, %source, "request failed");

            StatusError::internal_server_error()
        })
    }
}
