use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::model::{OptionIndex, QuestionId, TestId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizResultError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("a result needs at least one question")]
    NoQuestions,
}

/// Why a session reached its terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    /// The user advanced past the last question.
    Finished,
    /// The test's time limit ran out first.
    TimeExpired,
}

/// Final state of one question within a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    pub selected: Option<OptionIndex>,
    pub correct_option: OptionIndex,
    /// The user advanced past this question, so it counts towards the score.
    pub counted: bool,
}

impl AnswerRecord {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.counted && self.selected == Some(self.correct_option)
    }
}

/// Outcome of a completed quiz session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    test_id: TestId,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    reason: CompletionReason,
    score: usize,
    total: usize,
    accuracy_percent: u8,
    answers: Vec<AnswerRecord>,
}

impl QuizResult {
    /// Build a result from the per-question records of a session.
    ///
    /// # Errors
    ///
    /// Returns `QuizResultError::InvalidTimeRange` if `completed_at` is before `started_at`.
    /// Returns `QuizResultError::NoQuestions` if `answers` is empty.
    pub fn from_answers(
        test_id: TestId,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        reason: CompletionReason,
        answers: Vec<AnswerRecord>,
    ) -> Result<Self, QuizResultError> {
        if completed_at < started_at {
            return Err(QuizResultError::InvalidTimeRange);
        }
        if answers.is_empty() {
            return Err(QuizResultError::NoQuestions);
        }

        let score = answers.iter().filter(|a| a.is_correct()).count();
        let total = answers.len();

        Ok(Self {
            test_id,
            started_at,
            completed_at,
            reason,
            score,
            total,
            accuracy_percent: round_percent(score, total),
            answers,
        })
    }

    #[must_use]
    pub fn test_id(&self) -> TestId {
        self.test_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn reason(&self) -> CompletionReason {
        self.reason
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn accuracy_percent(&self) -> u8 {
        self.accuracy_percent
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    /// Questions the user never advanced past (only possible on expiry).
    #[must_use]
    pub fn unanswered(&self) -> usize {
        self.answers.iter().filter(|a| !a.counted).count()
    }
}

/// `round(100 * part / whole)` with halves rounded up; `0` when `whole` is zero.
#[must_use]
pub fn round_percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole) as u128;
    let whole = whole as u128;
    let pct = (200 * part + whole) / (2 * whole);
    u8::try_from(pct).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn record(id: u64, selected: Option<usize>, correct: usize, counted: bool) -> AnswerRecord {
        AnswerRecord {
            question_id: QuestionId::new(id),
            selected: selected.and_then(OptionIndex::new),
            correct_option: OptionIndex::new(correct).unwrap(),
            counted,
        }
    }

    #[test]
    fn result_counts_only_advanced_correct_answers() {
        let now = fixed_now();
        let answers = vec![
            record(1, Some(1), 1, true),
            record(2, Some(0), 2, true),
            record(3, Some(1), 1, false),
        ];

        let result =
            QuizResult::from_answers(TestId::new(1), now, now, CompletionReason::TimeExpired, answers)
                .unwrap();

        assert_eq!(result.score(), 1);
        assert_eq!(result.total(), 3);
        assert_eq!(result.accuracy_percent(), 33);
        assert_eq!(result.unanswered(), 1);
    }

    #[test]
    fn result_rejects_inverted_time_range() {
        let now = fixed_now();
        let err = QuizResult::from_answers(
            TestId::new(1),
            now,
            now - chrono::Duration::seconds(1),
            CompletionReason::Finished,
            vec![record(1, None, 0, true)],
        )
        .unwrap_err();
        assert_eq!(err, QuizResultError::InvalidTimeRange);
    }

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(round_percent(1, 8), 13);
        assert_eq!(round_percent(2, 3), 67);
        assert_eq!(round_percent(1, 3), 33);
        assert_eq!(round_percent(4, 4), 100);
        assert_eq!(round_percent(0, 4), 0);
        assert_eq!(round_percent(1, 0), 0);
    }
}
