//! User Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use thiserror::Error;

use crate::{domain::carts::records::CartUuid, uuids::TypedUuid};

/// User UUID
pub type UserUuid = TypedUuid<UserRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Regular,
    Premium,
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Premium => "premium",
            Self::Admin => "admin",
        }
    }

    /// Roles that may be granted through a role change.
    #[must_use]
    pub const fn is_assignable(self) -> bool {
        matches!(self, Self::Regular | Self::Premium)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown value: {0}")]
pub struct UnknownValue(pub String);

impl FromStr for Role {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "regular" => Ok(Self::Regular),
            "premium" => Ok(Self::Premium),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatus {
    Pending,
    Active,
}

impl UserStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
        }
    }
}

impl FromStr for UserStatus {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

/// Uploaded document metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    /// File name without its final extension.
    pub name: String,
    /// Where the file server stored the upload.
    pub reference: String,
}

/// User Record
///
/// Never carries the password hash.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub uuid: UserUuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: u32,
    pub role: Role,
    pub status: UserStatus,
    pub cart_uuid: Option<CartUuid>,
    pub documents: Vec<DocumentRecord>,
    pub last_connection: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
