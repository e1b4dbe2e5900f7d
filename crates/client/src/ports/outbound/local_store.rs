//! Local durable key-value storage port.

use super::error::StorageError;

/// Synchronous key-value storage scoped to the local machine profile.
///
/// Holds the guest-mode keys; writes complete before the call returns (no
/// async boundary, matching the single-threaded mutation model).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait LocalStorePort: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key; absent keys are a successful no-op.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
