//! Product Handlers

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod update;

use salvo::prelude::StatusError;

use storefront_app::{
    auth::Identity,
    domain::{products::data::ProductScope, users::records::Role},
};

/// Products the caller may modify; regular users may modify none.
fn mutation_scope(caller: &Identity) -> Result<ProductScope, StatusError> {
    match caller.role {
        Role::Admin => Ok(ProductScope::Any),
        Role::Premium => Ok(ProductScope::OwnedBy(caller.email.clone())),
        Role::Regular => Err(StatusError::forbidden()
            .brief("Only premium users and administrators manage products")),
    }
}
