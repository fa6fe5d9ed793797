//! Catalog

pub mod errors;
pub mod models;
pub mod service;
mod store;

pub use errors::CatalogServiceError;
pub use service::*;
pub use store::*;
