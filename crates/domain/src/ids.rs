use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Prefix carried by every locally generated guest uid.
///
/// The remote identity provider never issues uids with this prefix, so the
/// two id spaces are disjoint by construction.
pub const GUEST_UID_PREFIX: &str = "guest-";

macro_rules! define_string_id {
    ($name:ident, $entity:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new id, rejecting empty input.
            pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(DomainError::invalid_id(concat!(
                        $entity,
                        " id cannot be empty"
                    )));
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

// Catalog item slugs ("pomodoro", "kanban-board", ...)
define_string_id!(ItemId, "item");

// Provider-issued or locally generated session uids
define_string_id!(UserId, "user");

impl UserId {
    /// Build a guest uid from a timestamp and a random nonce.
    ///
    /// The shape is `guest-<millis>-<nonce>`; see [`GUEST_UID_PREFIX`].
    pub fn guest(now_millis: i64, nonce: &str) -> Self {
        Self(format!("{GUEST_UID_PREFIX}{now_millis}-{nonce}"))
    }

    /// Whether this uid was generated locally for a guest session.
    pub fn is_guest_uid(&self) -> bool {
        self.0.starts_with(GUEST_UID_PREFIX)
    }
}
