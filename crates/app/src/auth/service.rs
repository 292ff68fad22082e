//! Auth service.

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use tracing::debug;

use crate::{
    auth::{
        AuthServiceError, Identity, IssuedSession, ParsedSessionToken, SessionTokenVersion,
        build_verifier_input, format_session_token, generate_session_token_secret,
        hash_verifier_input,
        models::{NewSession, SessionUuid},
        parse_session_token,
        repository::PgSessionsRepository,
    },
    database::Db,
    domain::users::records::UserUuid,
};

/// Default lifetime of a session.
pub const DEFAULT_SESSION_TTL: SignedDuration = SignedDuration::from_hours(24);

#[derive(Debug, Clone)]
pub struct PgAuthService {
    db: Db,
    ttl: SignedDuration,
    repository: PgSessionsRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db, ttl: SignedDuration) -> Self {
        Self {
            db,
            ttl,
            repository: PgSessionsRepository::new(),
        }
    }

    /// Resolve a parsed token to its session, checking the verifier digest.
    async fn resolve(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        parsed: &ParsedSessionToken,
    ) -> Result<(SessionUuid, Identity), AuthServiceError> {
        let session = SessionUuid::from_uuid(parsed.token_uuid);

        let active = self
            .repository
            .find_active_session(tx, session, parsed.version)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if !active.accepts(parsed) {
            debug!(%session, "session verifier mismatch");

            return Err(AuthServiceError::NotFound);
        }

        Ok((session, active.identity))
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Identity, AuthServiceError> {
        let parsed =
            parse_session_token(bearer_token).map_err(|_invalid| AuthServiceError::NotFound)?;

        let mut tx = self.db.begin().await?;

        let (session, identity) = self.resolve(&mut tx, &parsed).await?;

        self.repository.touch_session(&mut tx, session).await?;

        tx.commit().await?;

        Ok(identity)
    }

    async fn issue_session(
        &self,
        user: UserUuid,
        now: Timestamp,
    ) -> Result<IssuedSession, AuthServiceError> {
        let session = SessionUuid::new();
        let version = SessionTokenVersion::V1;
        let secret = generate_session_token_secret();
        let token = format_session_token(session.into_uuid(), version, &secret);

        let token_hash = hash_verifier_input(&build_verifier_input(
            &session.into_uuid(),
            version,
            &user,
            &secret,
        ));

        let expires_at = now
            .checked_add(self.ttl)
            .map_err(|_overflow| AuthServiceError::InvalidExpiry)?;

        let mut tx = self.db.begin().await?;

        let metadata = self
            .repository
            .create_session(
                &mut tx,
                &NewSession {
                    uuid: session,
                    user_uuid: user,
                    version,
                    token_hash,
                    expires_at,
                },
            )
            .await?;

        tx.commit().await?;

        Ok(IssuedSession { token, metadata })
    }

    async fn revoke_bearer(&self, bearer_token: &str) -> Result<Identity, AuthServiceError> {
        let parsed =
            parse_session_token(bearer_token).map_err(|_invalid| AuthServiceError::NotFound)?;

        let mut tx = self.db.begin().await?;

        let (session, identity) = self.resolve(&mut tx, &parsed).await?;

        self.repository.revoke_session(&mut tx, session).await?;

        tx.commit().await?;

        Ok(identity)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token into the identity of its session.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Identity, AuthServiceError>;

    /// Start a session for `user`, returning the raw token once.
    async fn issue_session(
        &self,
        user: UserUuid,
        now: Timestamp,
    ) -> Result<IssuedSession, AuthServiceError>;

    /// Revoke the session behind a bearer token.
    async fn revoke_bearer(&self, bearer_token: &str) -> Result<Identity, AuthServiceError>;
}
