//! Ledger timestamp type.
//!
//! Timestamps are ledger time in seconds, supplied by block headers.
//! Validation never reads the wall clock; expiry is a deterministic
//! comparison against the enclosing block's time, so every node reaches
//! the same accept/reject decision.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A ledger timestamp in seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Seconds elapsed since this timestamp (relative to `now`).
    pub fn elapsed_since(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }

    /// Whether this timestamp has passed relative to `now`.
    ///
    /// A timestamp exactly equal to `now` counts as passed: an order whose
    /// expiration equals the block time is already expired.
    pub fn has_passed(&self, now: Timestamp) -> bool {
        now.0 >= self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiration_boundary_is_inclusive() {
        let expiration = Timestamp::new(100);
        assert!(!expiration.has_passed(Timestamp::new(99)));
        assert!(expiration.has_passed(Timestamp::new(100)));
        assert!(expiration.has_passed(Timestamp::new(101)));
        assert!(Timestamp::EPOCH.has_passed(Timestamp::EPOCH));
    }
}
