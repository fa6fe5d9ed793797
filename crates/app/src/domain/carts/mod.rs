//! Carts

pub mod errors;
pub mod models;
pub mod policy;
pub mod service;
mod store;

pub use errors::CartsServiceError;
pub use service::*;
pub use store::*;
