use std::sync::Arc;

use clap::Args;
use jiff::{SignedDuration, Timestamp};
use storefront_app::{
    database::{self, Db},
    domain::users::{
        PgUsersService,
        sweep::{AccountSweeper, DefaultAccountSweeper},
    },
};

use crate::cli::mail::MailArgs;

#[derive(Debug, Args)]
pub(crate) struct SweepArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Account that is never swept
    #[arg(long, env = "STOREFRONT_ADMIN_EMAIL")]
    admin_email: String,

    /// Hours without a connection before an account is swept
    #[arg(long, env = "STOREFRONT_INACTIVITY_HOURS", default_value_t = 48)]
    inactivity_hours: i64,

    #[command(flatten)]
    mail: MailArgs,
}

pub(crate) async fn run(args: SweepArgs) -> Result<(), String> {
    if args.inactivity_hours <= 0 {
        return Err("inactivity-hours must be positive".to_string());
    }

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let sweeper = DefaultAccountSweeper::new(
        Arc::new(PgUsersService::new(Db::new(pool), None)),
        args.mail.notifier()?,
        SignedDuration::from_hours(args.inactivity_hours),
        args.admin_email,
    );

    let report = sweeper
        .sweep(Timestamp::now())
        .await
        .map_err(|error| format!("failed to sweep accounts: {error}"))?;

    for notification in &report.notifications {
        match &notification.error {
            None => println!("notified: {}", notification.email),
            Some(error) => println!("notification failed: {} ({error})", notification.email),
        }
    }

    println!("deleted: {}", report.deleted);

    Ok(())
}
