//! User Handlers

pub(crate) mod add_documents;
pub(crate) mod change_role;
pub(crate) mod index;
pub(crate) mod sweep;
