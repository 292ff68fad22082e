//! Server configuration module

use clap::Parser;

use crate::config::{
    accounts::AccountsConfig,
    db::DatabaseConfig,
    mail::MailConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
};

pub(crate) mod accounts;
pub(crate) mod db;
pub(crate) mod mail;
pub(crate) mod observability;
pub(crate) mod server;

/// Storefront JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "storefront-json", about = "Storefront JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces/metrics) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Outbound mail settings.
    #[command(flatten)]
    pub mail: MailConfig,

    /// Account and session settings.
    #[command(flatten)]
    pub accounts: AccountsConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_apply_when_only_the_database_is_given() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "storefront-json",
            "--database-url",
            "postgres://localhost/storefront",
        ])?;

        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
        assert_eq!(config.accounts.session_ttl_hours, 24);
        assert_eq!(config.accounts.inactivity_hours, 48);
        assert!(config.mail.smtp_host.is_none(), "mail should default to logging");

        Ok(())
    }
}
