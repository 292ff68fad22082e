//! Ticket Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::tickets::TicketsServiceError;

pub(crate) fn into_status_error(error: TicketsServiceError) -> StatusError {
    match error {
        TicketsServiceError::NotFound => StatusError::not_found().brief("Ticket not found"),
        TicketsServiceError::Sql(source) => {
            error!("ticket storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}
