//! Outbound email notifications.

mod errors;
mod log;
mod smtp;
pub mod templates;

use async_trait::async_trait;
use mockall::automock;

pub use errors::NotificationError;
pub use log::LogNotifier;
pub use smtp::{SmtpConfig, SmtpNotifier};

/// One purchased line as shown on a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    pub title: String,
    pub quantity: u32,
    /// Unit price in cents.
    pub unit_price: u64,
}

/// Purchase confirmation sent after a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub ticket: String,
    pub amount: u64,
    pub lines: Vec<ReceiptLine>,
}

#[automock]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send the receipt for a completed purchase.
    async fn send_purchase_receipt(
        &self,
        to: &str,
        receipt: &PurchaseReceipt,
    ) -> Result<(), NotificationError>;

    /// Tell a user their account was removed for inactivity.
    async fn send_account_deleted(&self, to: &str) -> Result<(), NotificationError>;
}
