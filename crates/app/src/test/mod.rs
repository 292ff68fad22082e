//! Test support for service-level integration tests.

pub(crate) mod helpers;

pub(crate) use context::{ADMIN_EMAIL, ADMIN_PASSWORD, TestContext};
