use chrono::{DateTime, Utc};

/// Source of upload dates and session start/finish timestamps.
///
/// Countdown seconds never come from here; they are driven by timer ticks.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn system() -> Self {
        Self::System
    }

    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }
}

// 2023-11-14T22:13:20Z
const SAMPLE_TIMESTAMP: i64 = 1_700_000_000;

/// Stable timestamp for sample data and deterministic tests.
///
/// # Panics
///
/// Panics if the constant timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(SAMPLE_TIMESTAMP, 0).expect("sample timestamp is valid")
}

#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}
