//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use storefront_app::auth::Identity;

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_identity(&mut self, identity: Identity);

    /// The authenticated caller, or 401 when the request carries none.
    fn identity_or_401(&self) -> Result<&Identity, StatusError>;

    /// The authenticated caller, or 403 unless they are an administrator.
    fn admin_or_403(&self) -> Result<&Identity, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_identity(&mut self, identity: Identity) {
        self.inject(identity);
    }

    fn identity_or_401(&self) -> Result<&Identity, StatusError> {
        self.obtain::<Identity>()
            .map_err(|_missing| StatusError::unauthorized().brief("Authentication required"))
    }

    fn admin_or_403(&self) -> Result<&Identity, StatusError> {
        let identity = self.identity_or_401()?;

        if !identity.is_admin() {
            return Err(StatusError::forbidden().brief("Administrator role required"));
        }

        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use storefront_app::domain::users::records::Role;

    use crate::test_helpers::identity;

    use super::*;

    #[test]
    fn missing_identity_is_unauthorized() {
        let depot = Depot::new();

        let result = depot.identity_or_401();

        assert!(
            result.is_err_and(|error| error.code == salvo::http::StatusCode::UNAUTHORIZED),
            "expected 401 without an identity"
        );
    }

    #[test]
    fn admin_check_rejects_other_roles() {
        let mut depot = Depot::new();

        depot.insert_identity(identity("premium@example.com", Role::Premium));

        let result = depot.admin_or_403();

        assert!(
            result.is_err_and(|error| error.code == salvo::http::StatusCode::FORBIDDEN),
            "expected 403 for a premium caller"
        );
    }

    #[test]
    fn admin_check_returns_the_admin() {
        let mut depot = Depot::new();

        depot.insert_identity(identity("admin@example.com", Role::Admin));

        assert_eq!(
            depot.admin_or_403().map(|admin| admin.email.as_str()).ok(),
            Some("admin@example.com")
        );
    }
}
