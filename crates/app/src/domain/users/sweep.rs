//! Inactive account sweep.
//!
//! Selecting, notifying and deleting are separate steps. A user may be notified and then
//! survive a failed delete.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use tracing::{info, warn};

use crate::{
    domain::users::{UsersService, errors::UsersServiceError, records::UserUuid},
    notifications::Notifier,
};

/// Default period without a connection after which an account is swept.
pub const DEFAULT_INACTIVITY: SignedDuration = SignedDuration::from_hours(48);

/// Delivery result for one swept address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepNotification {
    pub email: String,
    pub delivered: bool,
    /// Failure description when delivery did not succeed.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub notifications: Vec<SweepNotification>,
    pub deleted: u64,
}

#[automock]
#[async_trait]
pub trait AccountSweeper: Send + Sync {
    /// Notify and delete every account inactive as of `now`.
    async fn sweep(&self, now: Timestamp) -> Result<SweepReport, UsersServiceError>;
}

pub struct DefaultAccountSweeper {
    users: Arc<dyn UsersService>,
    notifier: Arc<dyn Notifier>,
    inactivity: SignedDuration,
    admin_email: String,
}

impl std::fmt::Debug for DefaultAccountSweeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultAccountSweeper")
            .field("inactivity", &self.inactivity)
            .field("admin_email", &self.admin_email)
            .finish_non_exhaustive()
    }
}

impl DefaultAccountSweeper {
    /// Accounts idle for longer than `inactivity` are swept, except `admin_email`.
    #[must_use]
    pub fn new(
        users: Arc<dyn UsersService>,
        notifier: Arc<dyn Notifier>,
        inactivity: SignedDuration,
        admin_email: String,
    ) -> Self {
        Self {
            users,
            notifier,
            inactivity,
            admin_email,
        }
    }
}

#[async_trait]
impl AccountSweeper for DefaultAccountSweeper {
    async fn sweep(&self, now: Timestamp) -> Result<SweepReport, UsersServiceError> {
        let cutoff = now
            .checked_sub(self.inactivity)
            .map_err(|_overflow| UsersServiceError::InvalidData)?;

        let inactive = self.users.list_inactive(cutoff, &self.admin_email).await?;

        let mut notifications = Vec::with_capacity(inactive.len());

        for user in &inactive {
            let result = self.notifier.send_account_deleted(&user.email).await;

            if let Err(error) = &result {
                warn!(email = %user.email, %error, "account deletion notice failed");
            }

            notifications.push(SweepNotification {
                email: user.email.clone(),
                delivered: result.is_ok(),
                error: result.err().map(|error| error.to_string()),
            });
        }

        let uuids: Vec<UserUuid> = inactive.iter().map(|user| user.uuid).collect();

        let deleted = self.users.delete_users(uuids).await?;

        info!(%cutoff, deleted, "inactive accounts swept");

        Ok(SweepReport {
            notifications,
            deleted,
        })
    }
}
