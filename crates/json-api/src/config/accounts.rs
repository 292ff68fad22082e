//! Accounts Config

use clap::Args;
use jiff::SignedDuration;
use zeroize::Zeroizing;

use storefront_app::{context::AppSettings, domain::users::data::AdminCredentials};

/// Account and session settings.
#[derive(Debug, Args)]
pub struct AccountsConfig {
    /// Email that registers as an administrator
    #[arg(long, env = "STOREFRONT_ADMIN_EMAIL")]
    pub admin_email: Option<String>,

    /// Password that must accompany the administrator email
    #[arg(long, env = "STOREFRONT_ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,

    /// Hours a session token stays valid
    #[arg(
        long,
        env = "STOREFRONT_SESSION_TTL_HOURS",
        default_value_t = 24,
        value_parser = clap::value_parser!(i64).range(1..)
    )]
    pub session_ttl_hours: i64,

    /// Hours without a connection before an account is swept
    #[arg(
        long,
        env = "STOREFRONT_INACTIVITY_HOURS",
        default_value_t = 48,
        value_parser = clap::value_parser!(i64).range(1..)
    )]
    pub inactivity_hours: i64,
}

impl AccountsConfig {
    /// Service settings; the admin account is only configured when both halves are set.
    pub(crate) fn app_settings(&self, run_migrations: bool) -> AppSettings {
        let admin = self
            .admin_email
            .clone()
            .zip(self.admin_password.clone())
            .map(|(email, password)| AdminCredentials {
                email,
                password: Zeroizing::new(password),
            });

        AppSettings {
            admin,
            session_ttl: SignedDuration::from_hours(self.session_ttl_hours),
            inactivity: SignedDuration::from_hours(self.inactivity_hours),
            run_migrations,
        }
    }
}
