//! Mail Config

use std::sync::Arc;

use clap::Args;
use zeroize::Zeroizing;

use storefront_app::notifications::{
    LogNotifier, NotificationError, Notifier, SmtpConfig, SmtpNotifier,
};

/// Outbound mail settings. Notifications are only logged when no SMTP host is set.
#[derive(Debug, Args)]
pub struct MailConfig {
    /// SMTP relay host
    #[arg(long, env = "SMTP_HOST")]
    pub smtp_host: Option<String>,

    /// SMTP relay port
    #[arg(long, env = "SMTP_PORT", default_value_t = 587)]
    pub smtp_port: u16,

    /// SMTP username
    #[arg(long, env = "SMTP_USERNAME", default_value = "")]
    pub smtp_username: String,

    /// SMTP password
    #[arg(long, env = "SMTP_PASSWORD", default_value = "", hide_env_values = true)]
    pub smtp_password: String,

    /// Sender mailbox
    #[arg(
        long,
        env = "MAIL_FROM",
        default_value = "Storefront <no-reply@localhost>"
    )]
    pub mail_from: String,
}

impl MailConfig {
    /// Build the notifier these settings describe.
    pub(crate) fn notifier(&self) -> Result<Arc<dyn Notifier>, NotificationError> {
        let Some(host) = &self.smtp_host else {
            return Ok(Arc::new(LogNotifier));
        };

        let notifier = SmtpNotifier::new(&SmtpConfig {
            host: host.clone(),
            port: self.smtp_port,
            username: self.smtp_username.clone(),
            password: Zeroizing::new(self.smtp_password.clone()),
            from: self.mail_from.clone(),
        })?;

        Ok(Arc::new(notifier))
    }
}
