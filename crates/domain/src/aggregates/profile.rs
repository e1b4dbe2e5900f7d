//! Profile aggregate - gameplay progression for the active identity
//!
//! # Invariants
//!
//! - `level` is at least 1 and never decreases
//! - `level` tracks `xp` through [`Profile::level_for_xp`] whenever xp is
//!   earned; conversion between session kinds copies both values verbatim
//!   and never recomputes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// Gameplay progression attached to the active identity.
///
/// Fields are private: every mutation path keeps the level monotonic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    uid: UserId,
    level: u32,
    xp: u32,
    created_at: DateTime<Utc>,
    last_login: DateTime<Utc>,
}

/// Partial profile update, merged field-by-field.
///
/// Backs guest-record merge writes and remote merge-writes; absent fields
/// are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatch {
    pub level: Option<u32>,
    pub xp: Option<u32>,
    pub last_login: Option<DateTime<Utc>>,
}

impl ProfilePatch {
    /// Patch that sets xp only; the level is recomputed on apply.
    pub fn with_xp(xp: u32) -> Self {
        Self {
            xp: Some(xp),
            ..Self::default()
        }
    }

    /// Patch carrying progression verbatim, for conversion merge-writes.
    pub fn progress(level: u32, xp: u32) -> Self {
        Self {
            level: Some(level),
            xp: Some(xp),
            ..Self::default()
        }
    }
}

impl Profile {
    /// A fresh profile: level 1, zero xp.
    pub fn new(uid: UserId, now: DateTime<Utc>) -> Self {
        Self {
            uid,
            level: 1,
            xp: 0,
            created_at: now,
            last_login: now,
        }
    }

    /// A profile with progression carried over verbatim.
    ///
    /// Used by the conversion protocol, which preserves the guest's
    /// level/xp rather than recomputing them for the new uid.
    pub fn with_progress(uid: UserId, level: u32, xp: u32, now: DateTime<Utc>) -> Self {
        Self {
            uid,
            level: level.max(1),
            xp,
            created_at: now,
            last_login: now,
        }
    }

    /// The level implied by an xp total: `floor(sqrt(xp / 100)) + 1`.
    pub fn level_for_xp(xp: u32) -> u32 {
        (f64::from(xp) / 100.0).sqrt().floor() as u32 + 1
    }

    /// Earn xp and raise the level if the formula says so.
    ///
    /// The level never drops, even if xp were somehow lowered elsewhere.
    pub fn add_xp(&mut self, amount: u32) {
        self.xp = self.xp.saturating_add(amount);
        self.level = self.level.max(Self::level_for_xp(self.xp));
    }

    /// Merge a partial update.
    ///
    /// An explicit `level` wins; otherwise a changed `xp` re-derives the
    /// level, still subject to monotonicity.
    pub fn apply(&mut self, patch: &ProfilePatch) {
        if let Some(xp) = patch.xp {
            self.xp = xp;
        }
        match patch.level {
            Some(level) => self.level = level.max(1),
            None => {
                if patch.xp.is_some() {
                    self.level = self.level.max(Self::level_for_xp(self.xp));
                }
            }
        }
        if let Some(last_login) = patch.last_login {
            self.last_login = last_login;
        }
    }

    /// Record a sign-in without touching progression.
    pub fn touch_login(&mut self, now: DateTime<Utc>) {
        self.last_login = now;
    }

    #[inline]
    pub fn uid(&self) -> &UserId {
        &self.uid
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[inline]
    pub fn xp(&self) -> u32 {
        self.xp
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn last_login(&self) -> DateTime<Utc> {
        self.last_login
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        "2026-01-15T10:00:00Z".parse().expect("valid timestamp")
    }

    fn uid() -> UserId {
        UserId::guest(1700000000000, "abc123def")
    }

    #[test]
    fn test_fresh_profile() {
        let profile = Profile::new(uid(), now());
        assert_eq!(profile.level(), 1);
        assert_eq!(profile.xp(), 0);
    }

    #[test]
    fn test_level_formula_boundaries() {
        assert_eq!(Profile::level_for_xp(0), 1);
        assert_eq!(Profile::level_for_xp(99), 1);
        assert_eq!(Profile::level_for_xp(100), 2);
        assert_eq!(Profile::level_for_xp(399), 2);
        assert_eq!(Profile::level_for_xp(400), 3);
        assert_eq!(Profile::level_for_xp(900), 4);
        assert_eq!(Profile::level_for_xp(2840), 6);
    }

    #[test]
    fn test_add_xp_raises_level() {
        let mut profile = Profile::new(uid(), now());
        profile.add_xp(150);
        assert_eq!(profile.xp(), 150);
        assert_eq!(profile.level(), 2);
    }

    #[test]
    fn test_level_is_monotonic_under_patch() {
        let mut profile = Profile::with_progress(uid(), 3, 450, now());
        profile.apply(&ProfilePatch::with_xp(10));
        assert_eq!(profile.xp(), 10);
        // formula would say level 1, but the level never drops
        assert_eq!(profile.level(), 3);
    }

    #[test]
    fn test_patch_with_explicit_level() {
        let mut profile = Profile::new(uid(), now());
        profile.apply(&ProfilePatch::progress(3, 450));
        assert_eq!(profile.level(), 3);
        assert_eq!(profile.xp(), 450);
    }

    #[test]
    fn test_patch_xp_rederives_level() {
        let mut profile = Profile::new(uid(), now());
        profile.apply(&ProfilePatch::with_xp(150));
        assert_eq!(profile.level(), 2);
    }
}
