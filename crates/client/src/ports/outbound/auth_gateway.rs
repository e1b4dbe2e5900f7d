//! Remote auth gateway port
//!
//! Thin contract over the remote identity provider and its profile
//! document store. The core depends only on this trait; the concrete
//! provider adapter maps its own error codes through
//! [`AuthError::from_provider`](super::AuthError::from_provider).

use async_trait::async_trait;
use tokio::sync::watch;

use loadout_domain::{Identity, Profile, ProfilePatch, UserId};

use super::error::AuthError;

/// Port for the remote identity provider and profile store.
///
/// `identity_stream` is the sole channel by which the session layer learns
/// of external login/logout: the receiver holds the provider's current
/// identity and updates whenever the remote session changes.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AuthGatewayPort: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Identity, AuthError>;

    /// Sign in through a federated provider (popup flow on web).
    async fn login_federated(&self) -> Result<Identity, AuthError>;

    async fn logout(&self) -> Result<(), AuthError>;

    async fn reset_password(&self, email: &str) -> Result<(), AuthError>;

    /// Observe remote session changes; `None` means signed out.
    fn identity_stream(&self) -> watch::Receiver<Option<Identity>>;

    /// Load the profile for a uid, creating a default (level 1, xp 0) on
    /// first read. Re-registration of an existing uid loads the existing
    /// profile rather than resetting it.
    async fn load_profile(&self, uid: &UserId) -> Result<Profile, AuthError>;

    /// Merge-write profile fields for a uid.
    async fn save_profile(&self, uid: &UserId, patch: &ProfilePatch) -> Result<(), AuthError>;
}
