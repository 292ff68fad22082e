//! Users

pub mod data;
pub mod documents;
pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;
pub mod sweep;

pub use errors::UsersServiceError;
pub use service::*;
