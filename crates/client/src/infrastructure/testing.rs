//! In-memory adapters for tests and the demo runner.
//!
//! These stand in for the remote provider and document store so the full
//! session/sync stack can run without a network. The auth gateway applies
//! the same provider-side rules a real backend would (duplicate email,
//! weak password) so error mapping stays exercised.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::watch;
use uuid::Uuid;

use loadout_domain::{Identity, Profile, ProfilePatch, UserId};

use crate::application::dto::{InventoryDocument, ProfileDocument};
use crate::ports::outbound::{
    AuthError, AuthGatewayPort, ClockPort, InventoryRepo, LocalStorePort, RandomPort, RepoError,
    StorageError,
};

// =============================================================================
// Local store
// =============================================================================

/// Map-backed [`LocalStorePort`].
#[derive(Default)]
pub struct InMemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorePort for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().expect("lock poisoned").get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .expect("lock poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().expect("lock poisoned").remove(key);
        Ok(())
    }
}

// =============================================================================
// Deterministic randomness
// =============================================================================

/// Counter-backed [`RandomPort`] for reproducible ids in tests.
#[derive(Default)]
pub struct SequenceRandom {
    counter: AtomicU32,
}

impl SequenceRandom {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RandomPort for SequenceRandom {
    fn nonce(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("n{n:08}")
    }

    fn gen_uuid(&self) -> Uuid {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        Uuid::from_u128(u128::from(n))
    }
}

// =============================================================================
// Auth gateway
// =============================================================================

struct StoredUser {
    password: String,
    identity: Identity,
}

/// In-memory [`AuthGatewayPort`]: accounts, profile documents, and an
/// identity stream driven by login/logout.
pub struct InMemoryAuthGateway {
    users: Mutex<HashMap<String, StoredUser>>,
    profiles: Mutex<HashMap<String, ProfileDocument>>,
    identity_tx: watch::Sender<Option<Identity>>,
    clock: Arc<dyn ClockPort>,
    next_uid: AtomicU32,
}

impl InMemoryAuthGateway {
    pub fn new(clock: Arc<dyn ClockPort>) -> Self {
        let (identity_tx, _) = watch::channel(None);
        Self {
            users: Mutex::new(HashMap::new()),
            profiles: Mutex::new(HashMap::new()),
            identity_tx,
            clock,
            next_uid: AtomicU32::new(1),
        }
    }

    /// Push an identity change as if the provider reported it externally.
    pub fn emit_identity(&self, identity: Option<Identity>) {
        self.identity_tx.send_replace(identity);
    }

    fn issue_uid(&self) -> UserId {
        let n = self.next_uid.fetch_add(1, Ordering::SeqCst);
        UserId::new(format!("acct-{n:06}")).expect("non-empty uid")
    }

    fn default_profile_doc(&self, uid: &UserId) -> ProfileDocument {
        let identity = self
            .users
            .lock()
            .expect("lock poisoned")
            .values()
            .find(|user| user.identity.uid == *uid)
            .map(|user| user.identity.clone())
            .unwrap_or_else(|| Identity::guest(uid.clone(), self.clock.now()));
        ProfileDocument::for_identity(&identity, self.clock.now())
    }
}

#[async_trait]
impl AuthGatewayPort for InMemoryAuthGateway {
    async fn login(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let identity = {
            let mut users = self.users.lock().expect("lock poisoned");
            let user = users
                .get_mut(email)
                .ok_or_else(|| AuthError::from_provider("auth/user-not-found", None))?;
            if user.password != password {
                return Err(AuthError::from_provider("auth/wrong-password", None));
            }
            user.identity.last_sign_in_at = self.clock.now();
            user.identity.clone()
        };
        self.identity_tx.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Identity, AuthError> {
        if !email.contains('@') {
            return Err(AuthError::from_provider("auth/invalid-email", None));
        }
        if password.len() < 6 {
            return Err(AuthError::from_provider("auth/weak-password", None));
        }
        let identity = {
            let mut users = self.users.lock().expect("lock poisoned");
            if users.contains_key(email) {
                return Err(AuthError::from_provider("auth/email-already-in-use", None));
            }
            let identity = Identity::registered(
                self.issue_uid(),
                email,
                Some(display_name.to_string()),
                self.clock.now(),
            );
            users.insert(
                email.to_string(),
                StoredUser {
                    password: password.to_string(),
                    identity: identity.clone(),
                },
            );
            identity
        };
        self.identity_tx.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn login_federated(&self) -> Result<Identity, AuthError> {
        // one canned federated account, created on first use
        const FEDERATED_EMAIL: &str = "federated@example.com";
        let identity = {
            let mut users = self.users.lock().expect("lock poisoned");
            match users.get(FEDERATED_EMAIL) {
                Some(user) => user.identity.clone(),
                None => {
                    let identity = Identity::registered(
                        self.issue_uid(),
                        FEDERATED_EMAIL,
                        Some("Federated User".to_string()),
                        self.clock.now(),
                    );
                    users.insert(
                        FEDERATED_EMAIL.to_string(),
                        StoredUser {
                            password: String::new(),
                            identity: identity.clone(),
                        },
                    );
                    identity
                }
            }
        };
        self.identity_tx.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.identity_tx.send_replace(None);
        Ok(())
    }

    async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        let users = self.users.lock().expect("lock poisoned");
        if users.contains_key(email) {
            Ok(())
        } else {
            Err(AuthError::from_provider("auth/user-not-found", None))
        }
    }

    fn identity_stream(&self) -> watch::Receiver<Option<Identity>> {
        self.identity_tx.subscribe()
    }

    async fn load_profile(&self, uid: &UserId) -> Result<Profile, AuthError> {
        let doc = {
            let mut profiles = self.profiles.lock().expect("lock poisoned");
            profiles
                .entry(uid.to_string())
                .or_insert_with(|| self.default_profile_doc(uid))
                .clone()
        };
        doc.to_profile().map_err(|_| AuthError::Unexpected)
    }

    async fn save_profile(&self, uid: &UserId, patch: &ProfilePatch) -> Result<(), AuthError> {
        let mut profiles = self.profiles.lock().expect("lock poisoned");
        let doc = profiles
            .entry(uid.to_string())
            .or_insert_with(|| self.default_profile_doc(uid));
        if let Some(level) = patch.level {
            doc.level = level;
        }
        if let Some(xp) = patch.xp {
            doc.xp = xp;
        }
        if let Some(last_login) = patch.last_login {
            doc.last_login = last_login;
        }
        Ok(())
    }
}

// =============================================================================
// Inventory repository
// =============================================================================

/// In-memory [`InventoryRepo`] with version assignment and failure
/// injection.
#[derive(Default)]
pub struct InMemoryInventoryRepo {
    docs: Mutex<HashMap<String, InventoryDocument>>,
    fail_next: AtomicBool,
    saves: AtomicU64,
    attempts: AtomicU64,
}

impl InMemoryInventoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next save fail with a simulated network error.
    pub fn fail_next_save(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Successful saves so far.
    pub fn save_count(&self) -> u64 {
        self.saves.load(Ordering::SeqCst)
    }

    /// Save attempts so far, failed ones included.
    pub fn attempt_count(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// The stored document for a uid, if any.
    pub fn stored(&self, uid: &UserId) -> Option<InventoryDocument> {
        self.docs
            .lock()
            .expect("lock poisoned")
            .get(uid.as_str())
            .cloned()
    }
}

#[async_trait]
impl InventoryRepo for InMemoryInventoryRepo {
    async fn load(&self, uid: &UserId) -> Result<Option<InventoryDocument>, RepoError> {
        Ok(self
            .docs
            .lock()
            .expect("lock poisoned")
            .get(uid.as_str())
            .cloned())
    }

    async fn save(&self, uid: &UserId, doc: &InventoryDocument) -> Result<u64, RepoError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(RepoError::remote("save", "simulated network failure"));
        }
        let mut docs = self.docs.lock().expect("lock poisoned");
        let version = docs.get(uid.as_str()).map_or(1, |existing| {
            existing.version + 1
        });
        let mut stored = doc.clone();
        stored.version = version;
        docs.insert(uid.to_string(), stored);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::infrastructure::clock::FixedClock;

    fn gateway() -> InMemoryAuthGateway {
        InMemoryAuthGateway::new(Arc::new(FixedClock::at("2026-01-15T10:00:00Z")))
    }

    #[tokio::test]
    async fn when_registered_then_login_round_trips() {
        let gateway = gateway();
        let created = gateway
            .register("ada@example.com", "secret123", "Ada")
            .await
            .expect("register");
        let logged_in = gateway
            .login("ada@example.com", "secret123")
            .await
            .expect("login");
        assert_eq!(created.uid, logged_in.uid);
    }

    #[tokio::test]
    async fn when_email_taken_register_fails() {
        let gateway = gateway();
        gateway
            .register("ada@example.com", "secret123", "Ada")
            .await
            .expect("register");
        let err = gateway
            .register("ada@example.com", "other-pass", "Imposter")
            .await
            .expect_err("duplicate");
        assert_eq!(err, AuthError::EmailInUse);
    }

    #[tokio::test]
    async fn when_wrong_password_login_fails() {
        let gateway = gateway();
        gateway
            .register("ada@example.com", "secret123", "Ada")
            .await
            .expect("register");
        let err = gateway
            .login("ada@example.com", "nope")
            .await
            .expect_err("wrong password");
        assert_eq!(err, AuthError::WrongPassword);
    }

    #[tokio::test]
    async fn when_profile_loaded_first_time_it_is_fresh() {
        let gateway = gateway();
        let identity = gateway
            .register("ada@example.com", "secret123", "Ada")
            .await
            .expect("register");
        let profile = gateway.load_profile(&identity.uid).await.expect("load");
        assert_eq!(profile.level(), 1);
        assert_eq!(profile.xp(), 0);
    }

    #[tokio::test]
    async fn when_profile_saved_merge_applies() {
        let gateway = gateway();
        let identity = gateway
            .register("ada@example.com", "secret123", "Ada")
            .await
            .expect("register");
        gateway
            .save_profile(&identity.uid, &ProfilePatch::progress(3, 450))
            .await
            .expect("save");
        let profile = gateway.load_profile(&identity.uid).await.expect("load");
        assert_eq!(profile.level(), 3);
        assert_eq!(profile.xp(), 450);
    }

    #[tokio::test]
    async fn when_login_happens_stream_updates() {
        let gateway = gateway();
        let stream = gateway.identity_stream();
        assert!(stream.borrow().is_none());
        gateway
            .register("ada@example.com", "secret123", "Ada")
            .await
            .expect("register");
        assert!(stream.borrow().is_some());
        gateway.logout().await.expect("logout");
        assert!(stream.borrow().is_none());
    }

    #[tokio::test]
    async fn when_repo_version_monotonic() {
        let repo = InMemoryInventoryRepo::new();
        let uid = UserId::new("acct-000001").expect("uid");
        let grid = loadout_domain::catalog::default_placement();
        let now = "2026-01-15T10:00:00Z".parse().expect("timestamp");
        let doc = InventoryDocument::from_grid(&grid, now, 1);
        assert_eq!(repo.save(&uid, &doc).await.expect("save"), 1);
        assert_eq!(repo.save(&uid, &doc).await.expect("save"), 2);
        assert_eq!(repo.stored(&uid).map(|d| d.version), Some(2));
    }
}
