pub mod aggregates;
pub mod catalog;
pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

// Re-export all entities (explicit list in entities/mod.rs)
pub use entities::{Identity, Item, Rarity};

pub use error::DomainError;

// Re-export aggregates
pub use aggregates::{PlacedItem, Profile, ProfilePatch, SlotGrid, SLOT_COUNT};

// Re-export value objects
pub use value_objects::{DragController, DragState};

// Re-export ID types
pub use ids::{ItemId, UserId, GUEST_UID_PREFIX};
