//! Notifier that only records what would have been sent.

use async_trait::async_trait;
use tracing::info;

use crate::notifications::{NotificationError, Notifier, PurchaseReceipt};

#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_purchase_receipt(
        &self,
        to: &str,
        receipt: &PurchaseReceipt,
    ) -> Result<(), NotificationError> {
        info!(
            to,
            ticket = %receipt.ticket,
            amount = receipt.amount,
            lines = receipt.lines.len(),
            "purchase receipt (mail delivery disabled)"
        );

        Ok(())
    }

    async fn send_account_deleted(&self, to: &str) -> Result<(), NotificationError> {
        info!(to, "account deletion notice (mail delivery disabled)");

        Ok(())
    }
}
