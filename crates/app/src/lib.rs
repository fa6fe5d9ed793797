//! Storefront domain, persistence and cart policy.

pub mod context;
pub mod database;
pub mod domain;
pub mod store;

#[cfg(test)]
mod test;

mod uuids;

pub use uuids::TypedUuid;
