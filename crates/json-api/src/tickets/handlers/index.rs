//! Ticket Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*,
    state::State,
    tickets::{errors::into_status_error, models::TicketResponse},
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TicketsResponse {
    pub tickets: Vec<TicketResponse>,
}

/// Ticket Index Handler
///
/// Lists the caller's own tickets, newest first.
#[endpoint(
    tags("tickets"),
    summary = "List Own Tickets",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<TicketsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let caller = depot.identity_or_401()?;

    let tickets = state
        .app
        .tickets
        .list_tickets(&caller.email)
        .await
        .map_err(into_status_error)?;

    Ok(Json(TicketsResponse {
        tickets: tickets.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::users::records::Role;

    use crate::test_helpers::{TestApp, identity, make_ticket};

    use super::*;

    #[tokio::test]
    async fn test_index_lists_only_callers_tickets() -> TestResult {
        let mut app = TestApp::default();

        app.tickets
            .expect_list_tickets()
            .once()
            .withf(|purchaser| purchaser == "ana@example.com")
            .return_once(|purchaser| Ok(vec![make_ticket(purchaser, 1_500)]));

        let service = app.service(
            Some(identity("ana@example.com", Role::Regular)),
            Router::with_path("tickets").get(handler),
        );

        let mut res = TestClient::get("http://example.com/tickets")
            .send(&service)
            .await;

        let body: TicketsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.tickets.len(), 1);
        assert_eq!(
            body.tickets.first().map(|t| t.purchaser.as_str()),
            Some("ana@example.com")
        );

        Ok(())
    }
}
