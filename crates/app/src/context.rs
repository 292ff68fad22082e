//! App Context

use std::sync::Arc;

use jiff::SignedDuration;
use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        carts::{CartsService, PgCartsService},
        checkout::{CheckoutService, PgCheckoutService},
        products::{PgProductsService, ProductsService},
        tickets::{PgTicketsService, TicketsService},
        users::{
            PgUsersService, UsersService,
            data::AdminCredentials,
            sweep::{AccountSweeper, DefaultAccountSweeper},
        },
    },
    notifications::Notifier,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply migrations")]
    Migrate(#[source] sqlx::migrate::MigrateError),
}

/// Settings that shape the services beyond the database connection.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub admin: Option<AdminCredentials>,
    pub session_ttl: SignedDuration,
    pub inactivity: SignedDuration,
    pub run_migrations: bool,
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub checkout: Arc<dyn CheckoutService>,
    pub tickets: Arc<dyn TicketsService>,
    pub users: Arc<dyn UsersService>,
    pub auth: Arc<dyn AuthService>,
    pub notifier: Arc<dyn Notifier>,
    pub sweeper: Arc<dyn AccountSweeper>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or migrating fails.
    pub async fn from_database_url(
        url: &str,
        settings: AppSettings,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        if settings.run_migrations {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrate)?;
        }

        Ok(Self::from_db(&Db::new(pool), settings, notifier))
    }

    /// Wire the Postgres-backed services around an existing pool.
    #[must_use]
    pub fn from_db(db: &Db, settings: AppSettings, notifier: Arc<dyn Notifier>) -> Self {
        let admin_email = settings
            .admin
            .as_ref()
            .map(|admin| admin.email.clone())
            .unwrap_or_default();

        let users: Arc<dyn UsersService> =
            Arc::new(PgUsersService::new(db.clone(), settings.admin));

        let sweeper = DefaultAccountSweeper::new(
            Arc::clone(&users),
            Arc::clone(&notifier),
            settings.inactivity,
            admin_email,
        );

        Self {
            products: Arc::new(PgProductsService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            checkout: Arc::new(PgCheckoutService::new(db.clone())),
            tickets: Arc::new(PgTicketsService::new(db.clone())),
            auth: Arc::new(PgAuthService::new(db.clone(), settings.session_ttl)),
            users,
            notifier,
            sweeper: Arc::new(sweeper),
        }
    }
}
