//! Persisted document shapes.
//!
//! These mirror the stored JSON exactly (camelCase keys, `photoURL`
//! capitalization) and convert to/from domain types at the edges. Domain
//! code never sees them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use loadout_domain::{
    DomainError, Identity, Item, ItemId, PlacedItem, Profile, Rarity, SlotGrid, UserId,
};

// =============================================================================
// Guest record (local storage)
// =============================================================================

/// Timestamps nested under the guest record, provider-metadata style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestMetadata {
    pub creation_time: DateTime<Utc>,
    pub last_sign_in_time: DateTime<Utc>,
}

/// The `guest-user-record` local-storage document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestRecord {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub level: u32,
    pub xp: u32,
    pub metadata: GuestMetadata,
}

impl GuestRecord {
    pub fn from_parts(identity: &Identity, profile: &Profile) -> Self {
        Self {
            uid: identity.uid.to_string(),
            email: identity.email.clone(),
            display_name: identity.display_name.clone(),
            photo_url: identity.photo_url.clone(),
            level: profile.level(),
            xp: profile.xp(),
            metadata: GuestMetadata {
                creation_time: identity.created_at,
                last_sign_in_time: identity.last_sign_in_at,
            },
        }
    }

    /// Hydrate domain types; fails on a malformed uid.
    pub fn into_parts(self) -> Result<(Identity, Profile), DomainError> {
        let uid = UserId::new(self.uid)?;
        let identity = Identity {
            uid: uid.clone(),
            email: self.email,
            display_name: self.display_name,
            photo_url: self.photo_url,
            is_guest: true,
            created_at: self.metadata.creation_time,
            last_sign_in_at: self.metadata.last_sign_in_time,
        };
        let mut profile =
            Profile::with_progress(uid, self.level, self.xp, self.metadata.creation_time);
        profile.touch_login(self.metadata.last_sign_in_time);
        Ok((identity, profile))
    }
}

// =============================================================================
// Inventory document (remote store)
// =============================================================================

/// One occupied row of the persisted grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub category: String,
    pub rarity: Rarity,
    pub slot: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<DateTime<Utc>>,
}

impl ItemRecord {
    pub fn from_placed(placed: &PlacedItem) -> Self {
        Self {
            id: placed.item.id.to_string(),
            name: placed.item.name.clone(),
            icon: placed.item.icon.clone(),
            category: placed.item.category.clone(),
            rarity: placed.item.rarity,
            slot: placed.slot,
            description: placed.item.description.clone(),
            is_active: None,
            date_added: None,
        }
    }

    /// Back to a domain item; fails on a malformed id.
    pub fn into_item(self) -> Result<Item, DomainError> {
        Ok(Item {
            id: ItemId::new(self.id)?,
            name: self.name,
            icon: self.icon,
            rarity: self.rarity,
            category: self.category,
            description: self.description,
        })
    }
}

/// The per-user remote inventory document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDocument {
    pub inventory_slots: Vec<Option<ItemRecord>>,
    pub last_updated: DateTime<Utc>,
    pub version: u64,
}

impl InventoryDocument {
    /// Full snapshot of a grid.
    pub fn from_grid(grid: &SlotGrid, now: DateTime<Utc>, version: u64) -> Self {
        Self {
            inventory_slots: grid
                .slots()
                .iter()
                .map(|slot| slot.as_ref().map(ItemRecord::from_placed))
                .collect(),
            last_updated: now,
            version,
        }
    }

    /// Rebuild the grid, tolerating malformed rows (dropped, not fatal).
    pub fn into_grid(self) -> SlotGrid {
        SlotGrid::hydrate(
            self.inventory_slots
                .into_iter()
                .map(|row| row.and_then(|record| record.into_item().ok())),
        )
    }
}

// =============================================================================
// Profile document (remote store)
// =============================================================================

/// The per-user remote profile document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDocument {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
    pub level: u32,
    pub xp: u32,
    pub is_guest: bool,
}

impl ProfileDocument {
    /// Default document for a freshly registered identity.
    pub fn for_identity(identity: &Identity, now: DateTime<Utc>) -> Self {
        Self {
            uid: identity.uid.to_string(),
            email: identity.email.clone(),
            display_name: identity.display_name.clone(),
            photo_url: identity.photo_url.clone(),
            created_at: now,
            last_login: now,
            level: 1,
            xp: 0,
            is_guest: false,
        }
    }

    pub fn to_profile(&self) -> Result<Profile, DomainError> {
        let uid = UserId::new(self.uid.clone())?;
        let mut profile = Profile::with_progress(uid, self.level, self.xp, self.created_at);
        profile.touch_login(self.last_login);
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadout_domain::catalog;

    fn now() -> DateTime<Utc> {
        "2026-01-15T10:00:00Z".parse().expect("valid timestamp")
    }

    #[test]
    fn test_guest_record_uses_wire_key_names() {
        let uid = UserId::guest(1700000000000, "abc123def");
        let identity = Identity::guest(uid.clone(), now());
        let profile = Profile::new(uid, now());
        let record = GuestRecord::from_parts(&identity, &profile);
        let json = serde_json::to_value(&record).expect("serialize");

        assert!(json.get("displayName").is_some());
        assert!(json.get("photoURL").is_some());
        let metadata = json.get("metadata").expect("metadata");
        assert!(metadata.get("creationTime").is_some());
        assert!(metadata.get("lastSignInTime").is_some());
    }

    #[test]
    fn test_guest_record_round_trip() {
        let uid = UserId::guest(1700000000000, "abc123def");
        let identity = Identity::guest(uid.clone(), now());
        let mut profile = Profile::new(uid, now());
        profile.add_xp(150);
        let record = GuestRecord::from_parts(&identity, &profile);
        let json = serde_json::to_string(&record).expect("serialize");
        let back: GuestRecord = serde_json::from_str(&json).expect("deserialize");
        let (identity2, profile2) = back.into_parts().expect("hydrate");
        assert_eq!(identity2, identity);
        assert_eq!(profile2.xp(), 150);
        assert_eq!(profile2.level(), 2);
    }

    #[test]
    fn test_inventory_document_shape() {
        let grid = catalog::default_placement();
        let doc = InventoryDocument::from_grid(&grid, now(), 3);
        assert_eq!(doc.inventory_slots.len(), loadout_domain::SLOT_COUNT);
        let json = serde_json::to_value(&doc).expect("serialize");
        assert!(json.get("inventorySlots").is_some());
        assert!(json.get("lastUpdated").is_some());
        assert_eq!(json.get("version").and_then(|v| v.as_u64()), Some(3));
    }

    #[test]
    fn test_inventory_document_round_trip() {
        let grid = catalog::default_placement();
        let doc = InventoryDocument::from_grid(&grid, now(), 1);
        let restored = doc.into_grid();
        assert_eq!(restored, grid);
    }

    #[test]
    fn test_unknown_rarity_survives_hydration() {
        let raw = r#"{
            "inventorySlots": [
                {"id": "mystery", "name": "Mystery", "icon": "?", "category": "misc",
                 "rarity": "mythic", "slot": 0}
            ],
            "lastUpdated": "2026-01-15T10:00:00Z",
            "version": 1
        }"#;
        let doc: InventoryDocument = serde_json::from_str(raw).expect("deserialize");
        let grid = doc.into_grid();
        assert_eq!(grid.get(0).map(|p| p.item.rarity), Some(Rarity::Unknown));
    }
}
