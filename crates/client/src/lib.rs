//! Loadout client core.
//!
//! Application services, outbound ports, and infrastructure adapters for the
//! Loadout dashboard: session lifecycle (guest and registered), inventory
//! grid sync, and the ambient audio session. Rendering lives elsewhere and
//! only ever reads state snapshots from here.

pub mod application;
pub mod infrastructure;
pub mod ports;

// Re-export commonly used entrypoints
pub use application::services::{
    AudioSession, GuestService, SessionService, SessionState, SyncConfig, SyncController,
    SyncState,
};
pub use ports::outbound::{AuthError, RepoError, SessionError, StorageError};
