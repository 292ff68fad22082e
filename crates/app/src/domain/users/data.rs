//! User Data

use zeroize::Zeroizing;

use crate::domain::users::records::UserUuid;

/// New User Data
#[derive(Clone)]
pub struct NewUser {
    pub uuid: UserUuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: u32,
    pub password: Zeroizing<String>,
}

/// Uploaded file to register against a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub filename: String,
    pub reference: String,
}

/// Credentials that register an account as an administrator.
#[derive(Clone)]
pub struct AdminCredentials {
    pub email: String,
    pub password: Zeroizing<String>,
}

impl AdminCredentials {
    #[must_use]
    pub fn matches(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password.as_str() == password
    }
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("uuid", &self.uuid)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("age", &self.age)
            .field("password", &"**redacted**")
            .finish()
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password", &"**redacted**")
            .finish()
    }
}
