use std::sync::Arc;

use quiz_core::model::{CompletionReason, QuizResult, TestId, TimeLimit};
use quiz_core::session::{
    Advance, AnswerFeedback, QuizSession, SessionPhase, SessionSnapshot, SessionTick,
};
use tracing::{debug, info, warn};

use super::provider::QuestionSetProvider;
use super::timer::TimerHandle;
use crate::Clock;
use crate::error::QuizError;

/// Receives session notifications as they happen.
pub trait SessionObserver: Send {
    /// A countdown second elapsed.
    fn on_tick(&mut self, _remaining_seconds: u64) {}

    /// The session entered `phase`.
    fn on_phase_change(&mut self, _phase: SessionPhase, _reason: Option<CompletionReason>) {}
}

/// Loads question sets and starts sessions over them.
#[derive(Clone)]
pub struct QuizSessionService {
    clock: Clock,
    provider: Arc<dyn QuestionSetProvider>,
}

impl QuizSessionService {
    #[must_use]
    pub fn new(clock: Clock, provider: Arc<dyn QuestionSetProvider>) -> Self {
        Self { clock, provider }
    }

    /// Load a test and start a session, with a running timer if the test is timed.
    ///
    /// Must be called from within a tokio runtime when the test is timed.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::TestNotFound` if the test does not exist.
    /// Returns `QuizError::Session` with `QuestionSetEmpty` if it has no questions.
    pub async fn start_session(&self, test_id: TestId) -> Result<ActiveQuiz, QuizError> {
        let test = self.provider.load_test(test_id).await?;
        let questions = self.provider.load_questions(test_id).await?;
        let session = QuizSession::new(&test, questions, self.clock.now())?;
        let timer = session.is_timed().then(TimerHandle::every_second);

        info!(
            test_id = %test_id,
            questions = session.total_questions(),
            time_limit_minutes = test.time_limit().map(TimeLimit::minutes),
            "quiz session started"
        );
        Ok(ActiveQuiz {
            clock: self.clock,
            session,
            timer,
            observer: None,
        })
    }
}

/// A running session together with its timer and observer.
///
/// Dropping an `ActiveQuiz` cancels its timer.
pub struct ActiveQuiz {
    clock: Clock,
    session: QuizSession,
    timer: Option<TimerHandle>,
    observer: Option<Box<dyn SessionObserver>>,
}

impl ActiveQuiz {
    #[must_use]
    pub fn with_observer(mut self, observer: Box<dyn SessionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot(self.clock.now())
    }

    #[must_use]
    pub fn is_timer_running(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    /// Record a pick for the current question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session` when the pick is rejected; state is unchanged.
    pub fn select_option(&mut self, index: usize) -> Result<AnswerFeedback, QuizError> {
        match self.session.select_option(index) {
            Ok(feedback) => {
                debug!(
                    question = self.session.current_index(),
                    selected = %feedback.selected,
                    correct = feedback.is_correct,
                    "option selected"
                );
                Ok(feedback)
            }
            Err(e) => {
                warn!(index, error = %e, "option rejected");
                Err(e.into())
            }
        }
    }

    /// Move past the current question, completing the session after the last.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session` with `AlreadyCompleted` after the terminal phase.
    pub fn advance(&mut self) -> Result<Advance, QuizError> {
        let outcome = self.session.advance(self.clock.now()).inspect_err(|e| {
            warn!(error = %e, "advance rejected");
        })?;
        if outcome == Advance::Completed {
            self.finish();
        }
        Ok(outcome)
    }

    /// Wait for the next timer tick and apply it to the session.
    ///
    /// Returns `None` when the session has no running timer. Cancel safe.
    pub async fn next_timer_event(&mut self) -> Option<SessionTick> {
        let timer = self.timer.as_mut()?;
        timer.next_tick().await?;
        Some(self.apply_tick())
    }

    /// Apply one countdown second immediately.
    pub fn apply_tick(&mut self) -> SessionTick {
        let tick = self.session.tick(self.clock.now());
        match tick {
            SessionTick::Running { remaining_seconds } => {
                debug!(remaining_seconds, "tick");
                if let Some(observer) = self.observer.as_mut() {
                    observer.on_tick(remaining_seconds);
                }
            }
            SessionTick::Expired => {
                if let Some(observer) = self.observer.as_mut() {
                    observer.on_tick(0);
                }
                self.finish();
            }
            SessionTick::Untimed | SessionTick::Idle => {}
        }
        tick
    }

    /// Final result once the session is completed.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session` if the recorded timestamps are inconsistent.
    pub fn result(&self) -> Result<Option<QuizResult>, QuizError> {
        Ok(self.session.result()?)
    }

    /// Stop the timer without completing the session.
    pub fn reset(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }
    }

    fn finish(&mut self) {
        self.reset();
        let reason = self.session.completion_reason();
        info!(
            test_id = %self.session.test_id(),
            score = self.session.score(),
            total = self.session.total_questions(),
            reason = ?reason,
            "quiz session completed"
        );
        if let Some(observer) = self.observer.as_mut() {
            observer.on_phase_change(SessionPhase::Completed, reason);
        }
    }
}

impl std::fmt::Debug for ActiveQuiz {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveQuiz")
            .field("session", &self.session)
            .field("timer_running", &self.is_timer_running())
            .finish_non_exhaustive()
    }
}
