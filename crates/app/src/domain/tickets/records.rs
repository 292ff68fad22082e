//! Ticket Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Ticket UUID
pub type TicketUuid = TypedUuid<TicketRecord>;

/// Immutable receipt of a completed purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketRecord {
    pub uuid: TicketUuid,
    /// Sum of unit price times quantity over the purchased lines, in cents.
    pub amount: u64,
    /// Email of the purchasing account.
    pub purchaser: String,
    pub created_at: Timestamp,
}
