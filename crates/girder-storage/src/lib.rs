//! Storage abstraction for girder.
//!
//! Backend crates (e.g., girder-store-sqlite) implement the [`Store`] trait so
//! the billing/quota layer doesn't depend on any specific database engine or
//! schema details.

mod store;
mod types;

pub use store::{Store, StoreError, Transaction};
pub use types::*;
