//! Checkout Records

use crate::domain::{carts::records::ResolvedCartLine, tickets::records::TicketRecord};

/// Result of a successful purchase.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseOutcome {
    /// Lines whose stock was taken, with the product as it stood after the decrement.
    pub purchased: Vec<ResolvedCartLine>,
    /// Lines left in the cart.
    pub unprocessed: Vec<ResolvedCartLine>,
    pub ticket: TicketRecord,
}
