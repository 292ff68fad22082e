//! Ticket Models

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::tickets::records::TicketRecord;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TicketResponse {
    /// Ticket UUID, doubling as the purchase code
    pub uuid: Uuid,

    /// Total charged, in cents
    pub amount: u64,

    /// Email of the purchasing account
    pub purchaser: String,

    pub created_at: String,
}

impl From<TicketRecord> for TicketResponse {
    fn from(ticket: TicketRecord) -> Self {
        TicketResponse {
            uuid: ticket.uuid.into_uuid(),
            amount: ticket.amount,
            purchaser: ticket.purchaser,
            created_at: ticket.created_at.to_string(),
        }
    }
}
