//! Guest session manager.
//!
//! Sole writer of the guest-mode local storage keys. A guest session is a
//! locally generated identity plus a progression profile, persisted as two
//! keys: a mode flag and a camelCase JSON record.
//!
//! Hydration is fail-safe: unreadable or corrupt state is cleared and
//! reported as "not guest" rather than surfaced to the caller.

use std::sync::Arc;

use loadout_domain::{Identity, Profile, ProfilePatch, UserId};

use crate::application::dto::GuestRecord;
use crate::ports::outbound::{ClockPort, LocalStorePort, RandomPort, StorageError};

/// Local-storage key holding the literal `"true"` while a guest session
/// exists.
pub const GUEST_MODE_KEY: &str = "guest-mode-flag";

/// Local-storage key holding the serialized [`GuestRecord`].
pub const GUEST_RECORD_KEY: &str = "guest-user-record";

/// Creates, hydrates, updates, and clears the persisted guest session.
#[derive(Clone)]
pub struct GuestService {
    store: Arc<dyn LocalStorePort>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
}

impl GuestService {
    pub fn new(
        store: Arc<dyn LocalStorePort>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        Self {
            store,
            clock,
            random,
        }
    }

    /// Create and persist a fresh guest session.
    ///
    /// Repeated calls overwrite the previous guest (no merge) - the caller
    /// is expected to be in an unauthenticated window.
    pub fn create_guest_session(&self) -> Result<(Identity, Profile), StorageError> {
        let now = self.clock.now();
        let uid = UserId::guest(now.timestamp_millis(), &self.random.nonce());
        let identity = Identity::guest(uid.clone(), now);
        let profile = Profile::new(uid, now);

        let record = GuestRecord::from_parts(&identity, &profile);
        let json = serde_json::to_string(&record)
            .map_err(|e| StorageError::write(GUEST_RECORD_KEY, e))?;
        self.store.set(GUEST_MODE_KEY, "true")?;
        self.store.set(GUEST_RECORD_KEY, &json)?;

        tracing::info!(uid = %identity.uid, "created guest session");
        Ok((identity, profile))
    }

    /// Hydrate the persisted guest session, if any.
    ///
    /// Returns `None` when the flag is absent, and also when the backing
    /// store is unreadable or the record fails to parse - in those cases
    /// the corrupt state is cleared first so the next start is clean.
    pub fn check_guest_mode(&self) -> Option<(Identity, Profile)> {
        match self.store.get(GUEST_MODE_KEY) {
            Ok(Some(flag)) if flag == "true" => {}
            Ok(_) => return None,
            Err(err) => {
                tracing::warn!(error = %err, "guest flag unreadable; clearing guest state");
                self.clear_guest_data_best_effort();
                return None;
            }
        }

        let raw = match self.store.get(GUEST_RECORD_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::warn!("guest flag set but record missing; clearing guest state");
                self.clear_guest_data_best_effort();
                return None;
            }
            Err(err) => {
                tracing::warn!(error = %err, "guest record unreadable; clearing guest state");
                self.clear_guest_data_best_effort();
                return None;
            }
        };

        let parsed = serde_json::from_str::<GuestRecord>(&raw)
            .map_err(|e| StorageError::corrupt(GUEST_RECORD_KEY, e))
            .and_then(|record| {
                record
                    .into_parts()
                    .map_err(|e| StorageError::corrupt(GUEST_RECORD_KEY, e))
            });
        match parsed {
            Ok(parts) => Some(parts),
            Err(err) => {
                tracing::warn!(error = %err, "corrupt guest record; clearing guest state");
                self.clear_guest_data_best_effort();
                None
            }
        }
    }

    /// Merge partial profile fields into the persisted guest record.
    pub fn update_guest_data(&self, patch: &ProfilePatch) -> Result<(), StorageError> {
        let raw = self
            .store
            .get(GUEST_RECORD_KEY)?
            .ok_or(StorageError::MissingRecord)?;
        let record: GuestRecord = serde_json::from_str(&raw)
            .map_err(|e| StorageError::corrupt(GUEST_RECORD_KEY, e))?;
        let (identity, mut profile) = record
            .into_parts()
            .map_err(|e| StorageError::corrupt(GUEST_RECORD_KEY, e))?;

        profile.apply(patch);

        let updated = GuestRecord::from_parts(&identity, &profile);
        let json = serde_json::to_string(&updated)
            .map_err(|e| StorageError::write(GUEST_RECORD_KEY, e))?;
        self.store.set(GUEST_RECORD_KEY, &json)
    }

    /// Remove both guest keys. Idempotent.
    pub fn clear_guest_data(&self) -> Result<(), StorageError> {
        self.store.remove(GUEST_MODE_KEY)?;
        self.store.remove(GUEST_RECORD_KEY)
    }

    fn clear_guest_data_best_effort(&self) {
        if let Err(err) = self.clear_guest_data() {
            tracing::warn!(error = %err, "failed to clear guest state");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::testing::{InMemoryStore, SequenceRandom};

    fn service_with_store(store: Arc<InMemoryStore>) -> GuestService {
        GuestService::new(
            store,
            Arc::new(FixedClock::at("2026-01-15T10:00:00Z")),
            Arc::new(SequenceRandom::new()),
        )
    }

    #[test]
    fn when_created_guest_is_hydratable() {
        let store = Arc::new(InMemoryStore::new());
        let service = service_with_store(store.clone());

        let (identity, profile) = service.create_guest_session().expect("create");
        assert!(identity.uid.is_guest_uid());
        assert_eq!(profile.level(), 1);
        assert_eq!(profile.xp(), 0);

        let (hydrated_identity, hydrated_profile) =
            service.check_guest_mode().expect("guest present");
        assert_eq!(hydrated_identity, identity);
        assert_eq!(hydrated_profile, profile);
    }

    #[test]
    fn when_no_flag_reports_not_guest() {
        let service = service_with_store(Arc::new(InMemoryStore::new()));
        assert!(service.check_guest_mode().is_none());
    }

    #[test]
    fn when_xp_updated_round_trips() {
        let service = service_with_store(Arc::new(InMemoryStore::new()));
        service.create_guest_session().expect("create");

        service
            .update_guest_data(&ProfilePatch::with_xp(150))
            .expect("update");

        let (_, profile) = service.check_guest_mode().expect("guest present");
        assert_eq!(profile.xp(), 150);
        assert_eq!(profile.level(), 2);
    }

    #[test]
    fn when_record_corrupt_clears_and_reports_not_guest() {
        let store = Arc::new(InMemoryStore::new());
        let service = service_with_store(store.clone());
        store.set(GUEST_MODE_KEY, "true").expect("set");
        store.set(GUEST_RECORD_KEY, "{not json").expect("set");

        assert!(service.check_guest_mode().is_none());
        // corrupt state was cleared, not left to fail again
        assert_eq!(store.get(GUEST_MODE_KEY).expect("get"), None);
        assert_eq!(store.get(GUEST_RECORD_KEY).expect("get"), None);
    }

    #[test]
    fn when_repeated_create_overwrites_previous_guest() {
        let store = Arc::new(InMemoryStore::new());
        let service = GuestService::new(
            store,
            Arc::new(FixedClock::at("2026-01-15T10:00:00Z")),
            Arc::new(SequenceRandom::new()),
        );
        let (first, _) = service.create_guest_session().expect("create");
        let (second, _) = service.create_guest_session().expect("create");
        assert_ne!(first.uid, second.uid);

        let (hydrated, _) = service.check_guest_mode().expect("guest present");
        assert_eq!(hydrated.uid, second.uid);
    }

    #[test]
    fn when_cleared_twice_stays_ok() {
        let service = service_with_store(Arc::new(InMemoryStore::new()));
        service.create_guest_session().expect("create");
        service.clear_guest_data().expect("clear");
        service.clear_guest_data().expect("clear again");
        assert!(service.check_guest_mode().is_none());
    }

    #[test]
    fn when_update_without_guest_reports_missing() {
        let service = service_with_store(Arc::new(InMemoryStore::new()));
        let err = service
            .update_guest_data(&ProfilePatch::with_xp(10))
            .expect_err("no record");
        assert_eq!(err, StorageError::MissingRecord);
    }
}
