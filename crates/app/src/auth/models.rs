//! Auth data models.

use jiff::Timestamp;

use crate::{
    auth::{ParsedSessionToken, SessionTokenVersion, build_verifier_input, verify_verifier_input},
    domain::{
        carts::records::CartUuid,
        users::records::{Role, UserUuid},
    },
    uuids::TypedUuid,
};

/// Session UUID
pub type SessionUuid = TypedUuid<SessionMetadata>;

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_uuid: UserUuid,
    pub email: String,
    pub role: Role,
    pub cart_uuid: Option<CartUuid>,
}

impl Identity {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Session data used during bearer authentication.
#[derive(Debug, Clone)]
pub(crate) struct ActiveSession {
    pub version: SessionTokenVersion,

    /// SHA-256 verifier digest for the token secret material.
    pub token_hash: String,

    pub identity: Identity,
}

impl ActiveSession {
    /// Whether `parsed` carries this session's version and a secret matching its digest.
    pub(crate) fn accepts(&self, parsed: &ParsedSessionToken) -> bool {
        if self.version != parsed.version {
            return false;
        }

        let verifier_input = build_verifier_input(
            &parsed.token_uuid,
            parsed.version,
            &self.identity.user_uuid,
            &parsed.secret,
        );

        verify_verifier_input(&verifier_input, &self.token_hash)
    }
}

/// Session metadata persisted in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionMetadata {
    pub uuid: SessionUuid,
    pub user_uuid: UserUuid,
    pub version: SessionTokenVersion,
    pub created_at: Timestamp,
    pub last_used_at: Option<Timestamp>,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
}

/// New session persistence payload.
#[derive(Debug, Clone)]
pub(crate) struct NewSession {
    pub uuid: SessionUuid,
    pub user_uuid: UserUuid,
    pub version: SessionTokenVersion,
    pub token_hash: String,
    pub expires_at: Timestamp,
}

/// Session issuance result with the one-time raw token.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub metadata: SessionMetadata,
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use crate::auth::{SESSION_TOKEN_SECRET_BYTES, SessionTokenSecret, hash_verifier_input};

    use super::*;

    fn parsed(token_uuid: Uuid, byte: u8) -> ParsedSessionToken {
        ParsedSessionToken {
            token_uuid,
            version: SessionTokenVersion::V1,
            secret: SessionTokenSecret::from_bytes([byte; SESSION_TOKEN_SECRET_BYTES]),
        }
    }

    fn session_for(token: &ParsedSessionToken) -> ActiveSession {
        let identity = Identity {
            user_uuid: UserUuid::new(),
            email: "ana@example.com".to_string(),
            role: Role::Regular,
            cart_uuid: None,
        };

        let token_hash = hash_verifier_input(&build_verifier_input(
            &token.token_uuid,
            token.version,
            &identity.user_uuid,
            &token.secret,
        ));

        ActiveSession {
            version: token.version,
            token_hash,
            identity,
        }
    }

    #[test]
    fn session_accepts_its_own_token() {
        let token = parsed(Uuid::now_v7(), 0x42);

        assert!(session_for(&token).accepts(&token));
    }

    #[test]
    fn session_rejects_a_different_secret() {
        let token = parsed(Uuid::now_v7(), 0x42);
        let forged = parsed(token.token_uuid, 0x43);

        assert!(!session_for(&token).accepts(&forged));
    }
}
