//! Inventory snapshot repository port.

use async_trait::async_trait;

use loadout_domain::UserId;

use super::error::RepoError;
use crate::application::dto::InventoryDocument;

/// Port for the per-user remote inventory document.
///
/// Saves are idempotent full-snapshot overwrites; the store assigns a
/// monotonically increasing version on each successful write.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait InventoryRepo: Send + Sync {
    async fn load(&self, uid: &UserId) -> Result<Option<InventoryDocument>, RepoError>;

    /// Overwrite the stored snapshot, returning the new version.
    async fn save(&self, uid: &UserId, doc: &InventoryDocument) -> Result<u64, RepoError>;
}
