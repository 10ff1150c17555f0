//! Absolute cut-off for a single top-level search.

use std::time::{Duration, Instant};

/// Instant after which a search starts no further attempts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deadline {
    // None when `now + timeout` is not representable.
    at: Option<Instant>,
}

impl Deadline {
    /// Deadline `timeout` after `now`.
    pub fn after(now: Instant, timeout: Duration) -> Self {
        Self {
            at: now.checked_add(timeout),
        }
    }

    /// Returns true once `now` has reached the deadline.
    pub fn is_expired(&self, now: Instant) -> bool {
        self.at.is_some_and(|at| now >= at)
    }

    /// Time left before the deadline, zero once expired.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.at
            .map_or(Duration::MAX, |at| at.saturating_duration_since(now))
    }
}
