//! Clock and randomness ports.
//!
//! Injected so services never reach for the system clock or RNG directly;
//! tests pin both.

use chrono::{DateTime, Utc};
use uuid::Uuid;

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait RandomPort: Send + Sync {
    /// Short alphanumeric nonce (guest uid suffix).
    fn nonce(&self) -> String;

    fn gen_uuid(&self) -> Uuid;
}
