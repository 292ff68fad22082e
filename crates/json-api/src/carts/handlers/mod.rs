//! Cart Handlers

pub(crate) mod add_product;
pub(crate) mod clear;
pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod purchase;
pub(crate) mod remove_product;
pub(crate) mod replace;
pub(crate) mod set_quantity;
