//! Outbound ports - contracts the client core depends on.
//!
//! Adapters live in `crate::infrastructure`; tests use the generated
//! `Mock*` types.

pub mod auth_gateway;
pub mod error;
pub mod inventory_repo;
pub mod local_store;
pub mod platform;

pub use auth_gateway::*;
pub use error::*;
pub use inventory_repo::*;
pub use local_store::*;
pub use platform::*;
