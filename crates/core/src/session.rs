//! Quiz session state machine.
//!
//! A session owns the ordered questions of one test and moves from
//! `InProgress` to `Completed` either when the user advances past the last
//! question or when the test's countdown reaches zero. It performs no I/O;
//! timestamps are passed in by the caller's clock.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::countdown::{Countdown, TickOutcome};
use crate::model::{
    AnswerRecord, CompletionReason, OptionIndex, Question, QuestionId, QuizResult,
    QuizResultError, Test, TestId, round_percent,
};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("test has no questions")]
    QuestionSetEmpty,

    #[error("option index {index} is out of range")]
    InvalidOptionIndex { index: usize },

    #[error("an option was already selected for question {question}")]
    OptionAlreadySelected { question: usize },

    #[error("session already completed")]
    AlreadyCompleted,

    #[error(transparent)]
    Result(#[from] QuizResultError),
}

//
// ─── EVENTS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    InProgress,
    Completed,
}

/// What `advance` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the question at this index.
    Next(usize),
    /// Advanced past the last question.
    Completed,
}

/// What a timer tick did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTick {
    /// The test has no time limit.
    Untimed,
    Running { remaining_seconds: u64 },
    /// The countdown hit zero and the session was completed.
    Expired,
    /// The session or its countdown had already ended.
    Idle,
}

/// Data a renderer needs to show correctness after an option is picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerFeedback {
    pub question_id: QuestionId,
    pub selected: OptionIndex,
    pub correct_option: OptionIndex,
    pub is_correct: bool,
    pub correct_text: String,
    pub explanation: Option<String>,
}

/// Point-in-time view of a session, with all derived values computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub test_id: TestId,
    pub phase: SessionPhase,
    pub completion_reason: Option<CompletionReason>,
    pub current_index: usize,
    pub total_questions: usize,
    pub answered_indices: Vec<usize>,
    pub score: usize,
    pub selected_option: Option<OptionIndex>,
    pub remaining_seconds: Option<u64>,
    pub elapsed_seconds: u64,
    pub progress_percent: u8,
    pub accuracy_percent: Option<u8>,
    pub is_last_question: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

pub struct QuizSession {
    test_id: TestId,
    questions: Vec<Question>,
    current: usize,
    answered: BTreeSet<usize>,
    selections: Vec<Option<OptionIndex>>,
    score: usize,
    countdown: Option<Countdown>,
    phase: SessionPhase,
    completion: Option<CompletionReason>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Start a session over `questions`, timed if `test` has a limit.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::QuestionSetEmpty` if no questions are provided.
    pub fn new(
        test: &Test,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::QuestionSetEmpty);
        }

        Ok(Self {
            test_id: test.id(),
            selections: vec![None; questions.len()],
            questions,
            current: 0,
            answered: BTreeSet::new(),
            score: 0,
            countdown: test.time_limit().map(Countdown::start),
            phase: SessionPhase::InProgress,
            completion: None,
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn test_id(&self) -> TestId {
        self.test_id
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == SessionPhase::Completed
    }

    #[must_use]
    pub fn completion_reason(&self) -> Option<CompletionReason> {
        self.completion
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answered.len()
    }

    /// Option picked for the current question, if any.
    #[must_use]
    pub fn current_selection(&self) -> Option<OptionIndex> {
        self.selections[self.current]
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current == self.questions.len() - 1
    }

    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        round_percent(self.answered.len(), self.questions.len())
    }

    /// Share of all questions answered correctly; final once completed.
    #[must_use]
    pub fn accuracy_percent(&self) -> u8 {
        round_percent(self.score, self.questions.len())
    }

    #[must_use]
    pub fn is_timed(&self) -> bool {
        self.countdown.is_some()
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> Option<u64> {
        self.countdown.map(|c| c.remaining_seconds())
    }

    /// Seconds spent so far; countdown-based when timed, clock-based otherwise.
    #[must_use]
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        if let Some(countdown) = self.countdown {
            return countdown.elapsed_seconds();
        }
        let end = self.completed_at.unwrap_or(now);
        u64::try_from((end - self.started_at).num_seconds()).unwrap_or(0)
    }

    fn ensure_in_progress(&self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::InProgress => Ok(()),
            SessionPhase::Completed => Err(SessionError::AlreadyCompleted),
        }
    }

    /// Record the user's pick for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyCompleted` after the terminal phase,
    /// `SessionError::InvalidOptionIndex` for an index outside `0..4`, and
    /// `SessionError::OptionAlreadySelected` if the question already has a pick.
    /// State is unchanged on error.
    pub fn select_option(&mut self, index: usize) -> Result<AnswerFeedback, SessionError> {
        self.ensure_in_progress()?;
        let selected = OptionIndex::new(index).ok_or(SessionError::InvalidOptionIndex { index })?;
        if self.selections[self.current].is_some() {
            return Err(SessionError::OptionAlreadySelected {
                question: self.current,
            });
        }

        self.selections[self.current] = Some(selected);

        let question = &self.questions[self.current];
        Ok(AnswerFeedback {
            question_id: question.id(),
            selected,
            correct_option: question.correct_option(),
            is_correct: question.is_correct(selected),
            correct_text: question.option(question.correct_option()).to_owned(),
            explanation: question.explanation().map(str::to_owned),
        })
    }

    /// Score the current question (once) and move on, completing after the last.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyCompleted` after the terminal phase.
    pub fn advance(&mut self, at: DateTime<Utc>) -> Result<Advance, SessionError> {
        self.ensure_in_progress()?;

        if self.answered.insert(self.current) {
            let question = &self.questions[self.current];
            if self.selections[self.current].is_some_and(|s| question.is_correct(s)) {
                self.score += 1;
            }
        }

        if self.current + 1 < self.questions.len() {
            self.current += 1;
            Ok(Advance::Next(self.current))
        } else {
            self.complete(CompletionReason::Finished, at);
            Ok(Advance::Completed)
        }
    }

    /// Apply one second of the countdown; expiry completes the session.
    pub fn tick(&mut self, at: DateTime<Utc>) -> SessionTick {
        if self.is_complete() {
            return SessionTick::Idle;
        }
        let Some(countdown) = self.countdown.as_mut() else {
            return SessionTick::Untimed;
        };

        match countdown.tick() {
            TickOutcome::Running(remaining_seconds) => SessionTick::Running { remaining_seconds },
            TickOutcome::Expired => {
                self.complete(CompletionReason::TimeExpired, at);
                SessionTick::Expired
            }
            TickOutcome::Idle => SessionTick::Idle,
        }
    }

    fn complete(&mut self, reason: CompletionReason, at: DateTime<Utc>) {
        self.phase = SessionPhase::Completed;
        self.completion = Some(reason);
        self.completed_at = Some(at.max(self.started_at));
    }

    #[must_use]
    pub fn snapshot(&self, now: DateTime<Utc>) -> SessionSnapshot {
        SessionSnapshot {
            test_id: self.test_id,
            phase: self.phase,
            completion_reason: self.completion,
            current_index: self.current,
            total_questions: self.questions.len(),
            answered_indices: self.answered.iter().copied().collect(),
            score: self.score,
            selected_option: self.current_selection(),
            remaining_seconds: self.remaining_seconds(),
            elapsed_seconds: self.elapsed_seconds(now),
            progress_percent: self.progress_percent(),
            accuracy_percent: self.is_complete().then(|| self.accuracy_percent()),
            is_last_question: self.is_last_question(),
        }
    }

    /// Build the final result; `None` while the session is still running.
    ///
    /// # Errors
    ///
    /// Propagates `QuizResultError` if the recorded timestamps are inconsistent.
    pub fn result(&self) -> Result<Option<QuizResult>, SessionError> {
        let (Some(reason), Some(completed_at)) = (self.completion, self.completed_at) else {
            return Ok(None);
        };

        let answers = self
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| AnswerRecord {
                question_id: q.id(),
                selected: self.selections[i],
                correct_option: q.correct_option(),
                counted: self.answered.contains(&i),
            })
            .collect();

        Ok(Some(QuizResult::from_answers(
            self.test_id,
            self.started_at,
            completed_at,
            reason,
            answers,
        )?))
    }
}

impl std::fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizSession")
            .field("test_id", &self.test_id)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answered_len", &self.answered.len())
            .field("score", &self.score)
            .field("phase", &self.phase)
            .field("remaining_seconds", &self.remaining_seconds())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CategoryId, TimeLimit};
    use crate::time::fixed_now;

    fn build_test(limit: Option<i64>) -> Test {
        Test::new(
            TestId::new(1),
            "Weekly Current Affairs",
            CategoryId::new(1),
            fixed_now(),
            limit.and_then(TimeLimit::from_minutes),
        )
        .unwrap()
    }

    fn build_questions(correct: &[usize]) -> Vec<Question> {
        correct
            .iter()
            .enumerate()
            .map(|(i, c)| {
                Question::new(
                    QuestionId::new(i as u64 + 1),
                    TestId::new(1),
                    format!("Question {}", i + 1),
                    vec!["A".into(), "B".into(), "C".into(), "D".into()],
                    OptionIndex::new(*c).unwrap(),
                    None,
                )
                .unwrap()
            })
            .collect()
    }

    fn play(session: &mut QuizSession, picks: &[usize]) {
        for pick in picks {
            session.select_option(*pick).unwrap();
            session.advance(fixed_now()).unwrap();
        }
    }

    #[test]
    fn empty_question_set_is_rejected() {
        let err = QuizSession::new(&build_test(None), Vec::new(), fixed_now()).unwrap_err();
        assert_eq!(err, SessionError::QuestionSetEmpty);
    }

    #[test]
    fn all_correct_answers_score_full_marks() {
        let mut session =
            QuizSession::new(&build_test(None), build_questions(&[1, 2, 1, 2]), fixed_now())
                .unwrap();

        play(&mut session, &[1, 2, 1, 2]);

        assert_eq!(session.score(), 4);
        assert_eq!(session.phase(), SessionPhase::Completed);
        assert_eq!(session.completion_reason(), Some(CompletionReason::Finished));
        assert_eq!(session.accuracy_percent(), 100);
        assert_eq!(session.progress_percent(), 100);
    }

    #[test]
    fn all_wrong_answers_score_zero() {
        let mut session =
            QuizSession::new(&build_test(None), build_questions(&[1, 2, 1, 2]), fixed_now())
                .unwrap();

        play(&mut session, &[0, 0, 0, 0]);

        assert_eq!(session.score(), 0);
        assert!(session.is_complete());
        assert_eq!(session.accuracy_percent(), 0);
    }

    #[test]
    fn completes_only_after_last_advance() {
        let mut session =
            QuizSession::new(&build_test(None), build_questions(&[1, 2, 1, 2]), fixed_now())
                .unwrap();

        play(&mut session, &[1, 2, 1]);
        assert_eq!(session.phase(), SessionPhase::InProgress);
        assert!(session.is_last_question());
        assert_eq!(session.snapshot(fixed_now()).accuracy_percent, None);

        play(&mut session, &[2]);
        assert!(session.is_complete());
        assert_eq!(session.current_index(), 3);
    }

    #[test]
    fn out_of_range_selection_leaves_state_unchanged() {
        let mut session =
            QuizSession::new(&build_test(None), build_questions(&[1, 2, 1, 2]), fixed_now())
                .unwrap();

        let err = session.select_option(4).unwrap_err();
        assert_eq!(err, SessionError::InvalidOptionIndex { index: 4 });
        assert_eq!(session.score(), 0);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.current_selection(), None);
    }

    #[test]
    fn second_selection_on_same_question_is_rejected() {
        let mut session =
            QuizSession::new(&build_test(None), build_questions(&[1, 2]), fixed_now()).unwrap();

        let feedback = session.select_option(0).unwrap();
        assert!(!feedback.is_correct);
        assert_eq!(feedback.correct_option, OptionIndex::new(1).unwrap());
        assert_eq!(feedback.correct_text, "B");

        let err = session.select_option(1).unwrap_err();
        assert_eq!(err, SessionError::OptionAlreadySelected { question: 0 });
        assert_eq!(session.current_selection(), OptionIndex::new(0));
    }

    #[test]
    fn events_after_completion_are_rejected() {
        let mut session =
            QuizSession::new(&build_test(None), build_questions(&[0]), fixed_now()).unwrap();
        play(&mut session, &[0]);

        assert_eq!(
            session.advance(fixed_now()).unwrap_err(),
            SessionError::AlreadyCompleted
        );
        assert_eq!(
            session.select_option(0).unwrap_err(),
            SessionError::AlreadyCompleted
        );
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn advancing_without_selection_scores_nothing() {
        let mut session =
            QuizSession::new(&build_test(None), build_questions(&[1, 2]), fixed_now()).unwrap();

        assert_eq!(session.advance(fixed_now()).unwrap(), Advance::Next(1));
        assert_eq!(session.advance(fixed_now()).unwrap(), Advance::Completed);
        assert_eq!(session.score(), 0);
        assert_eq!(session.answered_count(), 2);
    }

    #[test]
    fn score_never_exceeds_question_count_and_progress_is_monotonic() {
        let mut session =
            QuizSession::new(&build_test(None), build_questions(&[0, 1, 2, 3, 0]), fixed_now())
                .unwrap();

        let mut last_progress = session.progress_percent();
        for pick in [0, 1, 2, 3, 0] {
            session.select_option(pick).unwrap();
            assert!(session.score() <= session.total_questions());
            assert!(session.answered_count() <= session.current_index() + 1);
            session.advance(fixed_now()).unwrap();
            assert!(session.score() <= session.total_questions());
            let progress = session.progress_percent();
            assert!(progress >= last_progress);
            last_progress = progress;
        }
        assert_eq!(session.score(), 5);
    }

    #[test]
    fn timed_session_counts_down_and_expires() {
        let mut session =
            QuizSession::new(&build_test(Some(1)), build_questions(&[1, 2]), fixed_now())
                .unwrap();
        assert_eq!(session.remaining_seconds(), Some(60));

        session.select_option(1).unwrap();
        session.advance(fixed_now()).unwrap();

        for _ in 0..59 {
            assert!(matches!(
                session.tick(fixed_now()),
                SessionTick::Running { .. }
            ));
        }
        assert_eq!(session.tick(fixed_now()), SessionTick::Expired);
        assert_eq!(session.tick(fixed_now()), SessionTick::Idle);

        assert_eq!(session.remaining_seconds(), Some(0));
        assert_eq!(session.completion_reason(), Some(CompletionReason::TimeExpired));
        assert_eq!(session.elapsed_seconds(fixed_now()), 60);

        let result = session.result().unwrap().unwrap();
        assert_eq!(result.score(), 1);
        assert_eq!(result.unanswered(), 1);
        assert_eq!(result.accuracy_percent(), 50);
    }

    #[test]
    fn untimed_session_reports_unknown_remaining() {
        let mut session =
            QuizSession::new(&build_test(Some(0)), build_questions(&[1]), fixed_now()).unwrap();
        assert_eq!(session.remaining_seconds(), None);
        assert_eq!(session.tick(fixed_now()), SessionTick::Untimed);
        assert_eq!(
            session.elapsed_seconds(fixed_now() + chrono::Duration::seconds(42)),
            42
        );
    }

    #[test]
    fn result_matches_running_score() {
        let mut session =
            QuizSession::new(&build_test(None), build_questions(&[1, 2, 1, 2]), fixed_now())
                .unwrap();
        assert!(session.result().unwrap().is_none());

        play(&mut session, &[1, 0, 1, 0]);

        let result = session.result().unwrap().unwrap();
        assert_eq!(result.score(), session.score());
        assert_eq!(result.accuracy_percent(), 50);
        assert_eq!(result.reason(), CompletionReason::Finished);
    }

    #[test]
    fn snapshot_reflects_derived_values() {
        let mut session =
            QuizSession::new(&build_test(Some(15)), build_questions(&[1, 2, 1, 2]), fixed_now())
                .unwrap();
        play(&mut session, &[1]);
        session.select_option(3).unwrap();

        let snapshot = session.snapshot(fixed_now());
        assert_eq!(snapshot.current_index, 1);
        assert_eq!(snapshot.answered_indices, vec![0]);
        assert_eq!(snapshot.progress_percent, 25);
        assert_eq!(snapshot.selected_option, OptionIndex::new(3));
        assert_eq!(snapshot.remaining_seconds, Some(900));
        assert!(!snapshot.is_last_question);
    }
}
