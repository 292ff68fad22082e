//! SMTP delivery through lettre.

use async_trait::async_trait;
use lettre::{
    Message, SmtpTransport, Transport,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use tracing::debug;
use zeroize::Zeroizing;

use crate::notifications::{
    NotificationError, Notifier, PurchaseReceipt,
    templates::{ACCOUNT_DELETED_SUBJECT, PURCHASE_SUBJECT, account_deleted, purchase_receipt},
};

/// SMTP relay settings.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: Zeroizing<String>,
    /// Sender mailbox, e.g. `Storefront <shop@example.com>`.
    pub from: String,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"**redacted**")
            .field("from", &self.from)
            .finish()
    }
}

#[derive(Clone)]
pub struct SmtpNotifier {
    transport: SmtpTransport,
    from: Mailbox,
}

impl std::fmt::Debug for SmtpNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpNotifier")
            .field("from", &self.from)
            .finish_non_exhaustive()
    }
}

impl SmtpNotifier {
    /// Build a notifier relaying through `config.host` over TLS.
    ///
    /// # Errors
    ///
    /// Returns an error when the sender address or relay host is invalid.
    pub fn new(config: &SmtpConfig) -> Result<Self, NotificationError> {
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| NotificationError::InvalidAddress(e.to_string()))?;

        let transport = SmtpTransport::relay(&config.host)
            .map_err(|e| NotificationError::Transport(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.as_str().to_string(),
            ))
            .build();

        Ok(Self { transport, from })
    }

    async fn send(&self, to: &str, subject: &str, body: String) -> Result<(), NotificationError> {
        let to = to
            .parse::<Mailbox>()
            .map_err(|e| NotificationError::InvalidAddress(e.to_string()))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body)
            .map_err(|e| NotificationError::Message(e.to_string()))?;

        let transport = self.transport.clone();

        tokio::task::spawn_blocking(move || {
            transport
                .send(&message)
                .map_err(|e| NotificationError::Transport(e.to_string()))
        })
        .await??;

        debug!(subject, "mail delivered");

        Ok(())
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_purchase_receipt(
        &self,
        to: &str,
        receipt: &PurchaseReceipt,
    ) -> Result<(), NotificationError> {
        self.send(to, PURCHASE_SUBJECT, purchase_receipt(receipt))
            .await
    }

    async fn send_account_deleted(&self, to: &str) -> Result<(), NotificationError> {
        self.send(to, ACCOUNT_DELETED_SUBJECT, account_deleted())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(from: &str) -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "mailer".to_string(),
            password: Zeroizing::new("hunter2".to_string()),
            from: from.to_string(),
        }
    }

    #[test]
    fn invalid_sender_is_rejected() {
        let result = SmtpNotifier::new(&config("not an address"));

        assert!(matches!(result, Err(NotificationError::InvalidAddress(_))));
    }

    #[test]
    fn config_debug_redacts_password() {
        let rendered = format!("{:?}", config("Shop <shop@example.com>"));

        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("**redacted**"));
    }
}
