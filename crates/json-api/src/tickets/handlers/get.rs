//! Get Ticket Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use storefront_app::domain::tickets::records::TicketUuid;

use crate::{
    extensions::*,
    state::State,
    tickets::{errors::into_status_error, models::TicketResponse},
};

/// Get Ticket Handler
///
/// Visible to its purchaser and to administrators.
#[endpoint(
    tags("tickets"),
    summary = "Get Ticket",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Ticket found"),
        (status_code = StatusCode::FORBIDDEN, description = "Ticket belongs to another user"),
        (status_code = StatusCode::NOT_FOUND, description = "Ticket not found"),
    ),
)]
pub(crate) async fn handler(
    ticket: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<TicketResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let caller = depot.identity_or_401()?;

    let ticket = state
        .app
        .tickets
        .get_ticket(TicketUuid::from_uuid(ticket.into_inner()))
        .await
        .map_err(into_status_error)?;

    if ticket.purchaser != caller.email && !caller.is_admin() {
        return Err(StatusError::forbidden().brief("Ticket belongs to another user"));
    }

    Ok(Json(ticket.into()))
}
