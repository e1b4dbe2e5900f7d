//! Application services.

pub mod audio_service;
pub mod guest_service;
pub mod session_service;
pub mod sync_service;

pub use audio_service::{AudioEvent, AudioSession, Track};
pub use guest_service::{GuestService, GUEST_MODE_KEY, GUEST_RECORD_KEY};
pub use session_service::{SessionService, SessionState};
pub use sync_service::{hydrate_inventory, SyncConfig, SyncController, SyncState};
