//! Aggregates - types with invariants to protect.

pub mod profile;
pub mod slot_grid;

pub use profile::{Profile, ProfilePatch};
pub use slot_grid::{PlacedItem, SlotGrid, SLOT_COUNT};
