//! Identity entity - the actor behind the current session
//!
//! Exactly one identity is active per running session: either a locally
//! generated guest or a provider-issued registered user. The two are never
//! held simultaneously.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// The current actor - guest or registered.
///
/// A data-carrying struct; validity of the uid shape is enforced by
/// [`UserId`], and the guest/registered split is carried explicitly in
/// `is_guest` so persisted copies stay self-describing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: UserId,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub is_guest: bool,
    pub created_at: DateTime<Utc>,
    pub last_sign_in_at: DateTime<Utc>,
}

impl Identity {
    /// A locally generated guest identity.
    ///
    /// Guests have no email, display name, or photo; `now` is injected
    /// rather than read from the system clock.
    pub fn guest(uid: UserId, now: DateTime<Utc>) -> Self {
        Self {
            uid,
            email: None,
            display_name: None,
            photo_url: None,
            is_guest: true,
            created_at: now,
            last_sign_in_at: now,
        }
    }

    /// A provider-issued registered identity.
    pub fn registered(
        uid: UserId,
        email: impl Into<String>,
        display_name: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            uid,
            email: Some(email.into()),
            display_name,
            photo_url: None,
            is_guest: false,
            created_at: now,
            last_sign_in_at: now,
        }
    }
}
