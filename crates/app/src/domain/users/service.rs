//! Users service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::info;
use zeroize::Zeroizing;

use crate::{
    auth::{PasswordError, hash_password, verify_password},
    database::Db,
    domain::{
        carts::{records::CartUuid, repositories::PgCartsRepository},
        users::{
            data::{AdminCredentials, NewDocument, NewUser},
            documents::{document_name, has_required_documents},
            errors::UsersServiceError,
            records::{DocumentRecord, Role, UserRecord, UserStatus, UserUuid},
            repository::{PgUsersRepository, UserRow},
        },
    },
};

impl From<PasswordError> for UsersServiceError {
    fn from(_error: PasswordError) -> Self {
        Self::PasswordHash
    }
}

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    admin: Option<AdminCredentials>,
    repository: PgUsersRepository,
    carts_repository: PgCartsRepository,
}

impl PgUsersService {
    /// `admin` names the credentials that register as an administrator, if any.
    #[must_use]
    pub fn new(db: Db, admin: Option<AdminCredentials>) -> Self {
        Self {
            db,
            admin,
            repository: PgUsersRepository::new(),
            carts_repository: PgCartsRepository::new(),
        }
    }

    async fn with_documents(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut user: UserRecord,
    ) -> Result<UserRecord, sqlx::Error> {
        let mut documents = self.repository.list_documents(tx, &[user.uuid]).await?;

        user.documents = documents.remove(&user.uuid).unwrap_or_default();

        Ok(user)
    }

    async fn with_all_documents(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut users: Vec<UserRecord>,
    ) -> Result<Vec<UserRecord>, sqlx::Error> {
        let uuids: Vec<UserUuid> = users.iter().map(|user| user.uuid).collect();

        let mut documents = self.repository.list_documents(tx, &uuids).await?;

        for user in &mut users {
            user.documents = documents.remove(&user.uuid).unwrap_or_default();
        }

        Ok(users)
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn register(&self, user: NewUser) -> Result<UserRecord, UsersServiceError> {
        if user.email.trim().is_empty() || user.password.is_empty() {
            return Err(UsersServiceError::MissingRequiredData);
        }

        let role = match &self.admin {
            Some(admin) if admin.matches(&user.email, &user.password) => Role::Admin,
            _ => Role::Regular,
        };

        let password_hash = hash_password(user.password.clone()).await?;

        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .create_cart(&mut tx, CartUuid::new())
            .await?;

        let created = self
            .repository
            .create_user(
                &mut tx,
                &UserRow {
                    uuid: user.uuid,
                    first_name: &user.first_name,
                    last_name: &user.last_name,
                    email: &user.email,
                    age: user.age,
                    password_hash: &password_hash,
                    role,
                    cart_uuid: cart.uuid,
                },
            )
            .await?;

        tx.commit().await?;

        info!(user = %created.uuid, role = %created.role, "registered user");

        Ok(created)
    }

    async fn authenticate(
        &self,
        email: &str,
        password: Zeroizing<String>,
        at: Timestamp,
    ) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let Some(credentials) = self.repository.find_credentials(&mut tx, email).await? else {
            return Err(UsersServiceError::InvalidCredentials);
        };

        if !verify_password(password, credentials.password_hash).await? {
            return Err(UsersServiceError::InvalidCredentials);
        }

        let mut user = credentials.user;

        self.repository
            .touch_last_connection(&mut tx, user.uuid, at)
            .await?;

        user.last_connection = Some(at);

        let user = self.with_documents(&mut tx, user).await?;

        tx.commit().await?;

        Ok(user)
    }

    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let found = self.repository.get_user(&mut tx, user).await?;
        let found = self.with_documents(&mut tx, found).await?;

        tx.commit().await?;

        Ok(found)
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let users = self.repository.list_users(&mut tx).await?;
        let users = self.with_all_documents(&mut tx, users).await?;

        tx.commit().await?;

        Ok(users)
    }

    async fn change_role(&self, user: UserUuid, role: Role) -> Result<UserRecord, UsersServiceError> {
        if !role.is_assignable() {
            return Err(UsersServiceError::InvalidRole);
        }

        let mut tx = self.db.begin().await?;

        let current = self.repository.lock_user(&mut tx, user).await?;

        if current.status != UserStatus::Active {
            return Err(UsersServiceError::InactiveAccount);
        }

        let updated = self.repository.update_role(&mut tx, user, role).await?;
        let updated = self.with_documents(&mut tx, updated).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn add_documents(
        &self,
        user: UserUuid,
        documents: Vec<NewDocument>,
    ) -> Result<UserRecord, UsersServiceError> {
        let uploaded: Vec<DocumentRecord> = documents
            .into_iter()
            .map(|document| DocumentRecord {
                name: document_name(&document.filename),
                reference: document.reference,
            })
            .collect();

        if uploaded.iter().any(|document| document.name.is_empty()) {
            return Err(UsersServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        let current = self.repository.lock_user(&mut tx, user).await?;

        self.repository
            .insert_documents(&mut tx, user, &uploaded)
            .await?;

        let current = self.with_documents(&mut tx, current).await?;

        let updated = if current.status == UserStatus::Pending
            && has_required_documents(&current.documents)
        {
            let activated = self.repository.activate_user(&mut tx, user).await?;

            info!(user = %user, "account activated");

            self.with_documents(&mut tx, activated).await?
        } else {
            current
        };

        tx.commit().await?;

        Ok(updated)
    }

    async fn record_connection(&self, user: UserUuid, at: Timestamp) -> Result<(), UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .repository
            .touch_last_connection(&mut tx, user, at)
            .await?;

        if rows_affected == 0 {
            return Err(UsersServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn list_inactive(
        &self,
        cutoff: Timestamp,
        excluded_email: &str,
    ) -> Result<Vec<UserRecord>, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let users = self
            .repository
            .list_inactive_users(&mut tx, cutoff, excluded_email)
            .await?;

        tx.commit().await?;

        Ok(users)
    }

    async fn delete_users(&self, users: Vec<UserUuid>) -> Result<u64, UsersServiceError> {
        if users.is_empty() {
            return Ok(0);
        }

        let mut tx = self.db.begin().await?;

        let deleted = self.repository.delete_users(&mut tx, &users).await?;

        tx.commit().await?;

        Ok(deleted)
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Register a new account together with its empty cart.
    async fn register(&self, user: NewUser) -> Result<UserRecord, UsersServiceError>;

    /// Check credentials and record `at` as the user's last connection.
    async fn authenticate(
        &self,
        email: &str,
        password: Zeroizing<String>,
        at: Timestamp,
    ) -> Result<UserRecord, UsersServiceError>;

    /// Retrieve a single user.
    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError>;

    /// Retrieve every user.
    async fn list_users(&self) -> Result<Vec<UserRecord>, UsersServiceError>;

    /// Switch an active user between the regular and premium roles.
    async fn change_role(&self, user: UserUuid, role: Role) -> Result<UserRecord, UsersServiceError>;

    /// Register uploaded documents, activating the account once all are present.
    async fn add_documents(
        &self,
        user: UserUuid,
        documents: Vec<NewDocument>,
    ) -> Result<UserRecord, UsersServiceError>;

    /// Record `at` as the user's last connection.
    async fn record_connection(&self, user: UserUuid, at: Timestamp) -> Result<(), UsersServiceError>;

    /// Users last seen before `cutoff`, excluding `excluded_email`. Users who never connected
    /// are not included.
    async fn list_inactive(
        &self,
        cutoff: Timestamp,
        excluded_email: &str,
    ) -> Result<Vec<UserRecord>, UsersServiceError>;

    /// Delete exactly the given users, returning how many rows went away.
    async fn delete_users(&self, users: Vec<UserUuid>) -> Result<u64, UsersServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use testresult::TestResult;

    use crate::{
        domain::carts::CartsService,
        test::{TestContext, helpers::new_user},
    };

    use super::*;

    fn secret(value: &str) -> Zeroizing<String> {
        Zeroizing::new(value.to_string())
    }

    fn upload(filename: &str) -> NewDocument {
        NewDocument {
            filename: filename.to_string(),
            reference: format!("/uploads/{filename}"),
        }
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn register_creates_pending_regular_user_with_cart() -> TestResult {
        let ctx = TestContext::new().await;

        let user = ctx.users.register(new_user("ana@example.com", "secret")).await?;

        assert_eq!(user.role, Role::Regular);
        assert_eq!(user.status, UserStatus::Pending);
        assert!(user.last_connection.is_none());

        let cart = user.cart_uuid.ok_or("user has no cart")?;

        assert!(ctx.carts.get_cart(cart).await?.lines.is_empty());

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn register_with_admin_credentials_grants_admin() -> TestResult {
        let ctx = TestContext::new().await;

        let user = ctx
            .users
            .register(new_user(crate::test::ADMIN_EMAIL, crate::test::ADMIN_PASSWORD))
            .await?;

        assert_eq!(user.role, Role::Admin);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn register_duplicate_email_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.users.register(new_user("ana@example.com", "secret")).await?;

        let result = ctx.users.register(new_user("ana@example.com", "other")).await;

        assert!(
            matches!(result, Err(UsersServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn authenticate_checks_password_and_records_connection() -> TestResult {
        let ctx = TestContext::new().await;
        let now = Timestamp::now();

        ctx.users.register(new_user("ana@example.com", "secret")).await?;

        let wrong = ctx
            .users
            .authenticate("ana@example.com", secret("nope"), now)
            .await;

        assert!(
            matches!(wrong, Err(UsersServiceError::InvalidCredentials)),
            "expected InvalidCredentials, got {wrong:?}"
        );

        let unknown = ctx
            .users
            .authenticate("nobody@example.com", secret("secret"), now)
            .await;

        assert!(matches!(unknown, Err(UsersServiceError::InvalidCredentials)));

        let user = ctx
            .users
            .authenticate("ana@example.com", secret("secret"), now)
            .await?;

        let stored = ctx.users.get_user(user.uuid).await?;

        assert!(stored.last_connection.is_some());

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn documents_activate_account_and_enable_role_change() -> TestResult {
        let ctx = TestContext::new().await;

        let user = ctx.users.register(new_user("ana@example.com", "secret")).await?;

        let pending = ctx.users.change_role(user.uuid, Role::Premium).await;

        assert!(
            matches!(pending, Err(UsersServiceError::InactiveAccount)),
            "expected InactiveAccount, got {pending:?}"
        );

        let partial = ctx
            .users
            .add_documents(user.uuid, vec![upload("identification.pdf")])
            .await?;

        assert_eq!(partial.status, UserStatus::Pending);

        let complete = ctx
            .users
            .add_documents(
                user.uuid,
                vec![upload("proof_of_address.png"), upload("account_statement.pdf")],
            )
            .await?;

        assert_eq!(complete.status, UserStatus::Active);
        assert_eq!(complete.documents.len(), 3);
        assert_eq!(complete.documents[0].name, "identification");

        let promoted = ctx.users.change_role(user.uuid, Role::Premium).await?;

        assert_eq!(promoted.role, Role::Premium);

        let admin = ctx.users.change_role(user.uuid, Role::Admin).await;

        assert!(matches!(admin, Err(UsersServiceError::InvalidRole)));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn list_inactive_skips_recent_never_connected_and_excluded() -> TestResult {
        let ctx = TestContext::new().await;
        let now = Timestamp::now();
        let cutoff = now - SignedDuration::from_hours(48);

        let stale = ctx.users.register(new_user("stale@example.com", "pw")).await?;
        let recent = ctx.users.register(new_user("recent@example.com", "pw")).await?;
        let excluded = ctx.users.register(new_user("boss@example.com", "pw")).await?;
        ctx.users.register(new_user("never@example.com", "pw")).await?;

        let long_ago = now - SignedDuration::from_hours(72);

        ctx.users.record_connection(stale.uuid, long_ago).await?;
        ctx.users.record_connection(recent.uuid, now).await?;
        ctx.users.record_connection(excluded.uuid, long_ago).await?;

        let inactive: Vec<UserUuid> = ctx
            .users
            .list_inactive(cutoff, "boss@example.com")
            .await?
            .iter()
            .map(|user| user.uuid)
            .collect();

        assert_eq!(inactive, vec![stale.uuid]);

        let deleted = ctx.users.delete_users(inactive).await?;

        assert_eq!(deleted, 1);
        assert!(matches!(
            ctx.users.get_user(stale.uuid).await,
            Err(UsersServiceError::NotFound)
        ));

        Ok(())
    }
}
