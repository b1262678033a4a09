use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{CategoryId, TestId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TestError {
    #[error("test name cannot be empty")]
    EmptyName,

    #[error("time limit must be between 1 and {max} minutes, got {0}", max = u32::MAX)]
    InvalidTimeLimit(i64),
}

//
// ─── TIME LIMIT ────────────────────────────────────────────────────────────────
//

/// Positive duration, in whole minutes, a test may be attempted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct TimeLimit(u32);

impl TimeLimit {
    /// Interprets a raw minute count, treating zero or negative values as "untimed".
    #[must_use]
    pub fn from_minutes(minutes: i64) -> Option<Self> {
        u32::try_from(minutes).ok().filter(|m| *m > 0).map(Self)
    }

    /// Reads a submitted limit. Zero or negative means untimed; only a value
    /// too large to represent is an error.
    ///
    /// # Errors
    ///
    /// Returns `TestError::InvalidTimeLimit` if `minutes` exceeds `u32::MAX`.
    pub fn parse(minutes: i64) -> Result<Option<Self>, TestError> {
        if u32::try_from(minutes).is_err() && minutes > 0 {
            return Err(TestError::InvalidTimeLimit(minutes));
        }
        Ok(Self::from_minutes(minutes))
    }

    #[must_use]
    pub fn minutes(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn total_seconds(self) -> u64 {
        u64::from(self.0) * 60
    }
}

impl TryFrom<i64> for TimeLimit {
    type Error = TestError;

    fn try_from(minutes: i64) -> Result<Self, Self::Error> {
        match Self::parse(minutes)? {
            Some(limit) => Ok(limit),
            None => Err(TestError::InvalidTimeLimit(minutes)),
        }
    }
}

impl From<TimeLimit> for u32 {
    fn from(limit: TimeLimit) -> Self {
        limit.0
    }
}

//
// ─── TEST ──────────────────────────────────────────────────────────────────────
//

/// A named set of questions belonging to a category, optionally timed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Test {
    id: TestId,
    name: String,
    category_id: CategoryId,
    uploaded_at: DateTime<Utc>,
    time_limit: Option<TimeLimit>,
}

impl Test {
    /// Creates a test definition.
    ///
    /// # Errors
    ///
    /// Returns `TestError::EmptyName` if the trimmed name is empty.
    pub fn new(
        id: TestId,
        name: impl Into<String>,
        category_id: CategoryId,
        uploaded_at: DateTime<Utc>,
        time_limit: Option<TimeLimit>,
    ) -> Result<Self, TestError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(TestError::EmptyName);
        }

        Ok(Self {
            id,
            name,
            category_id,
            uploaded_at,
            time_limit,
        })
    }

    /// Returns a copy with a storage-assigned identifier.
    #[must_use]
    pub fn with_id(mut self, id: TestId) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn id(&self) -> TestId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    #[must_use]
    pub fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }

    #[must_use]
    pub fn time_limit(&self) -> Option<TimeLimit> {
        self.time_limit
    }

    #[must_use]
    pub fn is_timed(&self) -> bool {
        self.time_limit.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn non_positive_limits_mean_untimed() {
        assert_eq!(TimeLimit::from_minutes(0), None);
        assert_eq!(TimeLimit::from_minutes(-5), None);
        assert_eq!(TimeLimit::from_minutes(15).map(TimeLimit::minutes), Some(15));
    }

    #[test]
    fn parse_treats_non_positive_as_untimed() {
        assert_eq!(TimeLimit::parse(0), Ok(None));
        assert_eq!(TimeLimit::parse(-3), Ok(None));
        assert_eq!(TimeLimit::parse(20), Ok(TimeLimit::from_minutes(20)));
        let too_long = i64::from(u32::MAX) + 1;
        assert_eq!(
            TimeLimit::parse(too_long),
            Err(TestError::InvalidTimeLimit(too_long))
        );
    }

    #[test]
    fn total_seconds_scales_minutes() {
        let limit = TimeLimit::from_minutes(2).unwrap();
        assert_eq!(limit.total_seconds(), 120);
    }

    #[test]
    fn time_limit_rejects_zero_when_deserialized() {
        let err = serde_json::from_str::<TimeLimit>("0");
        assert!(err.is_err());
        let ok: TimeLimit = serde_json::from_str("20").unwrap();
        assert_eq!(ok.minutes(), 20);
    }

    #[test]
    fn test_requires_name() {
        let err = Test::new(TestId::new(1), " ", CategoryId::new(1), fixed_now(), None)
            .unwrap_err();
        assert_eq!(err, TestError::EmptyName);
    }

    #[test]
    fn test_exposes_limit() {
        let test = Test::new(
            TestId::new(1),
            "General Science Quiz",
            CategoryId::new(3),
            fixed_now(),
            TimeLimit::from_minutes(15),
        )
        .unwrap();
        assert!(test.is_timed());
        assert_eq!(test.category_id(), CategoryId::new(3));
    }
}
