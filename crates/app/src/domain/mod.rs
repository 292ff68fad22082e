//! Storefront Domain Concerns

pub mod carts;
pub mod checkout;
pub mod products;
pub mod tickets;
pub mod users;
