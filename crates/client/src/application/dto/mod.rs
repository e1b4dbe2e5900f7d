//! Application-layer DTOs: validated requests and persisted documents.

pub mod documents;
pub mod requests;

pub use documents::{
    GuestMetadata, GuestRecord, InventoryDocument, ItemRecord, ProfileDocument,
};
pub use requests::{LoginRequest, RegisterRequest, ResetPasswordRequest};
