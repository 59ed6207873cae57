//! Type definitions for girder storage.

mod history;
mod ids;
mod notifications;
mod plans;
mod projects;
mod roles;
mod subscriptions;
mod usage;

// Re-export all types from submodules
pub use history::*;
pub use ids::*;
pub use notifications::*;
pub use plans::*;
pub use projects::*;
pub use roles::*;
pub use subscriptions::*;
pub use usage::*;
