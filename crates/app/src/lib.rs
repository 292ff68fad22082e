//! Storefront domain services, persistence and notifications.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod notifications;

#[cfg(test)]
mod test;

pub mod uuids;
