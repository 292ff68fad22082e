//! Session token formatting, parsing, and verifier construction.

use std::{fmt, str::FromStr};

use constant_time_eq::constant_time_eq;
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::domain::users::records::UserUuid;

/// Session token identifier prefix.
pub const SESSION_TOKEN_PREFIX: &str = "sf";

/// Number of secret bytes encoded in a token.
pub const SESSION_TOKEN_SECRET_BYTES: usize = 32;

const SESSION_TOKEN_SECRET_HEX_CHARS: usize = SESSION_TOKEN_SECRET_BYTES * 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTokenVersion {
    V1,
}

impl SessionTokenVersion {
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::V1 => 1,
        }
    }

    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::V1 => "v1",
        }
    }
}

impl TryFrom<i16> for SessionTokenVersion {
    type Error = SessionTokenError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::V1),
            _ => Err(SessionTokenError::UnsupportedVersion),
        }
    }
}

impl From<SessionTokenVersion> for i16 {
    fn from(value: SessionTokenVersion) -> Self {
        value.as_i16()
    }
}

impl FromStr for SessionTokenVersion {
    type Err = SessionTokenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "v1" => Ok(Self::V1),
            _ => Err(SessionTokenError::UnsupportedVersion),
        }
    }
}

#[derive(Clone)]
pub struct SessionTokenSecret {
    bytes: [u8; SESSION_TOKEN_SECRET_BYTES],
}

impl SessionTokenSecret {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; SESSION_TOKEN_SECRET_BYTES]) -> Self {
        Self { bytes }
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SESSION_TOKEN_SECRET_BYTES] {
        &self.bytes
    }
}

impl fmt::Debug for SessionTokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionTokenSecret(**redacted**)")?;
        Ok(())
    }
}

impl Drop for SessionTokenSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

#[derive(Debug, Clone)]
pub struct ParsedSessionToken {
    pub token_uuid: Uuid,
    pub version: SessionTokenVersion,
    pub secret: SessionTokenSecret,
}

#[derive(Debug, Error)]
pub enum SessionTokenError {
    #[error("session token format is invalid")]
    InvalidFormat,

    #[error("session token uses an unsupported version")]
    UnsupportedVersion,

    #[error("session token secret encoding is invalid")]
    InvalidSecretEncoding,
}

#[must_use]
pub fn generate_session_token_secret() -> SessionTokenSecret {
    let mut secret = [0_u8; SESSION_TOKEN_SECRET_BYTES];

    OsRng.fill_bytes(&mut secret);

    SessionTokenSecret::from_bytes(secret)
}

#[must_use]
pub fn format_session_token(
    token_uuid: Uuid,
    version: SessionTokenVersion,
    secret: &SessionTokenSecret,
) -> String {
    format!(
        "{SESSION_TOKEN_PREFIX}_{}_{}.{}",
        version.segment(),
        token_uuid.simple(),
        encode_secret_hex(secret.as_bytes())
    )
}

pub fn parse_session_token(token: &str) -> Result<ParsedSessionToken, SessionTokenError> {
    let (prefix_and_id, secret_hex) = token.split_once('.').ok_or(SessionTokenError::InvalidFormat)?;

    let mut id_parts = prefix_and_id.splitn(3, '_');

    let prefix = id_parts.next().ok_or(SessionTokenError::InvalidFormat)?;
    let version_segment = id_parts.next().ok_or(SessionTokenError::InvalidFormat)?;
    let token_uuid_segment = id_parts.next().ok_or(SessionTokenError::InvalidFormat)?;

    if prefix != SESSION_TOKEN_PREFIX {
        return Err(SessionTokenError::InvalidFormat);
    }

    let version = SessionTokenVersion::from_str(version_segment)?;

    let token_uuid =
        Uuid::try_parse(token_uuid_segment).map_err(|_| SessionTokenError::InvalidFormat)?;

    let secret = decode_secret_hex(secret_hex).ok_or(SessionTokenError::InvalidSecretEncoding)?;

    Ok(ParsedSessionToken {
        token_uuid,
        version,
        secret: SessionTokenSecret::from_bytes(secret),
    })
}

/// Build the canonical verifier input bytes for a token.
///
/// Format: `{token_uuid_hex}:{version_i16_decimal}:{user_uuid_hex}:{secret_hex}`
#[must_use]
pub fn build_verifier_input(
    token_uuid: &Uuid,
    version: SessionTokenVersion,
    user_uuid: &UserUuid,
    secret: &SessionTokenSecret,
) -> Vec<u8> {
    let input = format!(
        "{}:{}:{}:{}",
        token_uuid.simple(),
        version.as_i16(),
        user_uuid.into_uuid().simple(),
        encode_secret_hex(secret.as_bytes()),
    );

    input.into_bytes()
}

/// Digest stored in place of the token, as lowercase hex.
#[must_use]
pub fn hash_verifier_input(input: &[u8]) -> String {
    format!("{:x}", Sha256::digest(input))
}

/// Check `input` against a stored digest without leaking the mismatch position through timing.
#[must_use]
pub fn verify_verifier_input(input: &[u8], token_hash: &str) -> bool {
    constant_time_eq(hash_verifier_input(input).as_bytes(), token_hash.as_bytes())
}

fn encode_secret_hex(secret: &[u8; SESSION_TOKEN_SECRET_BYTES]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    let mut encoded = String::with_capacity(SESSION_TOKEN_SECRET_HEX_CHARS);

    for byte in secret {
        encoded.push(HEX[(byte >> 4) as usize] as char);
        encoded.push(HEX[(byte & 0x0f) as usize] as char);
    }

    encoded
}

fn decode_secret_hex(secret_hex: &str) -> Option<[u8; SESSION_TOKEN_SECRET_BYTES]> {
    if secret_hex.len() != SESSION_TOKEN_SECRET_HEX_CHARS {
        return None;
    }

    let mut secret = [0_u8; SESSION_TOKEN_SECRET_BYTES];
    let secret_bytes = secret_hex.as_bytes();

    for (index, byte) in secret.iter_mut().enumerate() {
        let hi = decode_hex_nibble(secret_bytes[index * 2])?;
        let lo = decode_hex_nibble(secret_bytes[(index * 2) + 1])?;

        *byte = (hi << 4) | lo;
    }

    Some(secret)
}

fn decode_hex_nibble(value: u8) -> Option<u8> {
    match value {
        b'0'..=b'9' => Some(value - b'0'),
        b'a'..=b'f' => Some(value - b'a' + 10),
        b'A'..=b'F' => Some(value - b'A' + 10),
        _ => None,
    }
}
