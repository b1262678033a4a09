use std::sync::{Arc, Mutex};

use quiz_core::model::{CategoryId, CompletionReason, TestId};
use quiz_core::session::{Advance, SessionError, SessionPhase, SessionTick};
use quiz_core::time::fixed_clock;
use services::{
    CategoryDraft, CategoryService, QuestionDraft, QuestionService, QuizError,
    QuizSessionService, SessionObserver, StorageQuestionSet, TestDraft, TestService,
};
use storage::repository::Storage;

struct Catalog {
    storage: Storage,
    category_id: CategoryId,
}

impl Catalog {
    async fn new() -> Self {
        let storage = Storage::in_memory();
        let category = CategoryService::new(storage.categories.clone())
            .create_category(CategoryDraft {
                name: "General Knowledge".into(),
                description: "Trivia".into(),
            })
            .await
            .unwrap();
        Self {
            storage,
            category_id: category.id(),
        }
    }

    async fn add_test(&self, time_limit: Option<i64>, correct: &[i64]) -> TestId {
        let test = TestService::new(
            fixed_clock(),
            self.storage.categories.clone(),
            self.storage.tests.clone(),
        )
        .create_test(TestDraft {
            name: "Mixed".into(),
            category_id: self.category_id,
            time_limit,
        })
        .await
        .unwrap();

        let questions =
            QuestionService::new(self.storage.tests.clone(), self.storage.questions.clone());
        for (i, correct_option) in correct.iter().enumerate() {
            questions
                .create_question(QuestionDraft {
                    test_id: test.id(),
                    text: format!("Question {}", i + 1),
                    options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                    correct_option: *correct_option,
                    explanation: None,
                })
                .await
                .unwrap();
        }
        test.id()
    }

    fn sessions(&self) -> QuizSessionService {
        QuizSessionService::new(
            fixed_clock(),
            Arc::new(StorageQuestionSet::from_storage(&self.storage)),
        )
    }
}

#[derive(Clone, Default)]
struct Recorder {
    ticks: Arc<Mutex<Vec<u64>>>,
    phases: Arc<Mutex<Vec<(SessionPhase, Option<CompletionReason>)>>>,
}

impl SessionObserver for Recorder {
    fn on_tick(&mut self, remaining_seconds: u64) {
        self.ticks.lock().unwrap().push(remaining_seconds);
    }

    fn on_phase_change(&mut self, phase: SessionPhase, reason: Option<CompletionReason>) {
        self.phases.lock().unwrap().push((phase, reason));
    }
}

#[tokio::test]
async fn answering_every_question_correctly_scores_full_marks() {
    let catalog = Catalog::new().await;
    let test_id = catalog.add_test(None, &[1, 2, 1, 2]).await;
    let mut quiz = catalog.sessions().start_session(test_id).await.unwrap();
    assert!(!quiz.is_timer_running());

    let mut last = None;
    for pick in [1, 2, 1, 2] {
        let feedback = quiz.select_option(pick).unwrap();
        assert!(feedback.is_correct);
        last = Some(quiz.advance().unwrap());
    }

    assert_eq!(last, Some(Advance::Completed));
    let snapshot = quiz.snapshot();
    assert_eq!(snapshot.score, 4);
    assert_eq!(snapshot.accuracy_percent, Some(100));
    assert_eq!(snapshot.progress_percent, 100);

    let result = quiz.result().unwrap().expect("completed");
    assert_eq!(result.reason(), CompletionReason::Finished);
    assert_eq!(result.score(), 4);
}

#[tokio::test]
async fn wrong_answers_score_zero() {
    let catalog = Catalog::new().await;
    let test_id = catalog.add_test(None, &[1, 2, 1, 2]).await;
    let mut quiz = catalog.sessions().start_session(test_id).await.unwrap();

    for _ in 0..4 {
        assert!(!quiz.select_option(0).unwrap().is_correct);
        quiz.advance().unwrap();
    }

    let result = quiz.result().unwrap().expect("completed");
    assert_eq!(result.score(), 0);
    assert_eq!(result.accuracy_percent(), 0);
}

#[tokio::test]
async fn events_after_completion_are_rejected() {
    let catalog = Catalog::new().await;
    let test_id = catalog.add_test(None, &[0]).await;
    let mut quiz = catalog.sessions().start_session(test_id).await.unwrap();
    quiz.advance().unwrap();

    let err = quiz.advance().unwrap_err();
    assert!(matches!(
        err,
        QuizError::Session(SessionError::AlreadyCompleted)
    ));
    let err = quiz.select_option(0).unwrap_err();
    assert!(matches!(
        err,
        QuizError::Session(SessionError::AlreadyCompleted)
    ));
}

#[tokio::test]
async fn test_without_questions_cannot_start() {
    let catalog = Catalog::new().await;
    let test_id = catalog.add_test(Some(5), &[]).await;
    let err = catalog.sessions().start_session(test_id).await.unwrap_err();
    assert!(matches!(
        err,
        QuizError::Session(SessionError::QuestionSetEmpty)
    ));
}

#[tokio::test]
async fn unknown_test_is_not_found() {
    let catalog = Catalog::new().await;
    let err = catalog
        .sessions()
        .start_session(TestId::new(404))
        .await
        .unwrap_err();
    assert!(matches!(err, QuizError::TestNotFound(id) if id == TestId::new(404)));
}

#[tokio::test(start_paused = true)]
async fn expiry_completes_timed_session_once() {
    let catalog = Catalog::new().await;
    let test_id = catalog.add_test(Some(1), &[1, 2]).await;
    let recorder = Recorder::default();
    let mut quiz = catalog
        .sessions()
        .start_session(test_id)
        .await
        .unwrap()
        .with_observer(Box::new(recorder.clone()));
    assert_eq!(quiz.snapshot().remaining_seconds, Some(60));

    quiz.select_option(1).unwrap();
    quiz.advance().unwrap();

    let mut running = 0;
    let mut expired = 0;
    while let Some(event) = quiz.next_timer_event().await {
        match event {
            SessionTick::Running { .. } => running += 1,
            SessionTick::Expired => expired += 1,
            other => panic!("unexpected tick: {other:?}"),
        }
    }
    assert_eq!(running, 59);
    assert_eq!(expired, 1);
    assert!(!quiz.is_timer_running());
    assert!(quiz.next_timer_event().await.is_none());

    let snapshot = quiz.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Completed);
    assert_eq!(snapshot.remaining_seconds, Some(0));
    assert_eq!(snapshot.completion_reason, Some(CompletionReason::TimeExpired));

    let result = quiz.result().unwrap().expect("completed");
    assert_eq!(result.score(), 1);
    assert_eq!(result.unanswered(), 1);

    assert_eq!(recorder.ticks.lock().unwrap().len(), 60);
    assert_eq!(
        *recorder.phases.lock().unwrap(),
        vec![(SessionPhase::Completed, Some(CompletionReason::TimeExpired))]
    );
    assert!(matches!(
        quiz.advance().unwrap_err(),
        QuizError::Session(SessionError::AlreadyCompleted)
    ));
}

#[tokio::test(start_paused = true)]
async fn finishing_early_stops_the_timer() {
    let catalog = Catalog::new().await;
    let test_id = catalog.add_test(Some(10), &[3]).await;
    let mut quiz = catalog.sessions().start_session(test_id).await.unwrap();
    assert!(quiz.is_timer_running());

    assert!(matches!(
        quiz.next_timer_event().await,
        Some(SessionTick::Running { remaining_seconds: 599 })
    ));

    quiz.select_option(3).unwrap();
    assert_eq!(quiz.advance().unwrap(), Advance::Completed);
    assert!(!quiz.is_timer_running());
    assert!(quiz.next_timer_event().await.is_none());
    assert_eq!(quiz.snapshot().remaining_seconds, Some(599));
}
