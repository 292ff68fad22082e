use std::sync::Arc;

use clap::Args;
use storefront_app::notifications::{LogNotifier, Notifier, SmtpConfig, SmtpNotifier};
use zeroize::Zeroizing;

/// Outbound mail settings; notifications are only logged when no SMTP host is set.
#[derive(Debug, Args)]
pub(crate) struct MailArgs {
    /// SMTP relay host
    #[arg(long, env = "SMTP_HOST")]
    smtp_host: Option<String>,

    /// SMTP relay port
    #[arg(long, env = "SMTP_PORT", default_value_t = 587)]
    smtp_port: u16,

    /// SMTP username
    #[arg(long, env = "SMTP_USERNAME", default_value = "")]
    smtp_username: String,

    /// SMTP password
    #[arg(long, env = "SMTP_PASSWORD", default_value = "", hide_env_values = true)]
    smtp_password: String,

    /// Sender mailbox
    #[arg(long, env = "MAIL_FROM", default_value = "Storefront <no-reply@localhost>")]
    mail_from: String,
}

impl MailArgs {
    pub(crate) fn notifier(self) -> Result<Arc<dyn Notifier>, String> {
        let Some(host) = self.smtp_host else {
            return Ok(Arc::new(LogNotifier));
        };

        let notifier = SmtpNotifier::new(&SmtpConfig {
            host,
            port: self.smtp_port,
            username: self.smtp_username,
            password: Zeroizing::new(self.smtp_password),
            from: self.mail_from,
        })
        .map_err(|error| format!("invalid mail settings: {error}"))?;

        Ok(Arc::new(notifier))
    }
}
