//! Pure countdown arithmetic for timed tests.
//!
//! The recurring one-second tick lives in the services layer; this type only
//! tracks how many seconds remain and reports expiry exactly once.

use serde::Serialize;

use crate::model::TimeLimit;

/// Result of applying a single tick to a [`Countdown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Time remains; carries the new remaining seconds.
    Running(u64),
    /// This tick brought the countdown to zero.
    Expired,
    /// The countdown had already expired; nothing changed.
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Countdown {
    total_seconds: u64,
    remaining_seconds: u64,
    expired: bool,
}

impl Countdown {
    #[must_use]
    pub fn start(limit: TimeLimit) -> Self {
        Self::from_seconds(limit.total_seconds())
    }

    #[must_use]
    pub fn from_seconds(total_seconds: u64) -> Self {
        Self {
            total_seconds,
            remaining_seconds: total_seconds,
            expired: total_seconds == 0,
        }
    }

    /// Decrements by one second, floored at zero.
    pub fn tick(&mut self) -> TickOutcome {
        if self.expired {
            return TickOutcome::Idle;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.expired = true;
            TickOutcome::Expired
        } else {
            TickOutcome::Running(self.remaining_seconds)
        }
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    #[must_use]
    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.total_seconds - self.remaining_seconds
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expired
    }
}

/// Formats seconds as `m:ss`, e.g. `14:05`.
#[must_use]
pub fn format_mm_ss(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
