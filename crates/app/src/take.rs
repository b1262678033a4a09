//! Terminal quiz runner.

use std::fmt::Write as _;
use std::io::Write as _;
use std::sync::Arc;

use anyhow::Context;
use quiz_core::countdown::format_mm_ss;
use quiz_core::model::{CompletionReason, OptionIndex, QuizResult, TestId};
use quiz_core::session::{Advance, AnswerFeedback, QuizSession, SessionPhase, SessionTick};
use services::{Clock, QuizError, QuizSessionService, SessionObserver, StorageQuestionSet};
use storage::repository::{Storage, TestRepository};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

/// Prints the countdown on whole minutes and during the last ten seconds.
struct CountdownPrinter;

impl SessionObserver for CountdownPrinter {
    fn on_tick(&mut self, remaining_seconds: u64) {
        if remaining_seconds > 0 && (remaining_seconds % 60 == 0 || remaining_seconds <= 10) {
            println!("  [{} left]", format_mm_ss(remaining_seconds));
        }
    }

    fn on_phase_change(&mut self, phase: SessionPhase, reason: Option<CompletionReason>) {
        if phase == SessionPhase::Completed && reason == Some(CompletionReason::TimeExpired) {
            println!();
            println!("Time's up!");
        }
    }
}

pub fn render_question(session: &QuizSession) -> String {
    let question = session.current_question();
    let mut out = format!(
        "\nQuestion {} of {}",
        session.current_index() + 1,
        session.total_questions()
    );
    if let Some(remaining) = session.remaining_seconds() {
        let _ = write!(out, "  ({} left)", format_mm_ss(remaining));
    }
    let _ = write!(out, "\n{}\n", question.text());
    for index in OptionIndex::all() {
        let _ = writeln!(out, "  {index}. {}", question.option(index));
    }
    out.push_str("Your answer (A-D): ");
    out
}

pub fn render_feedback(feedback: &AnswerFeedback, is_last: bool) -> String {
    let mut out = if feedback.is_correct {
        "Correct!".to_owned()
    } else {
        format!(
            "Incorrect. The answer is {}. {}",
            feedback.correct_option, feedback.correct_text
        )
    };
    if let Some(explanation) = &feedback.explanation {
        let _ = write!(out, "\n{explanation}");
    }
    let next = if is_last { "finish" } else { "continue" };
    let _ = write!(out, "\nPress Enter to {next}.");
    out
}

pub fn render_result(result: &QuizResult) -> String {
    let mut out = String::from("\nQuiz complete");
    if result.reason() == CompletionReason::TimeExpired {
        out.push_str(" (time expired)");
    }
    let _ = write!(
        out,
        "\nScore: {}/{}  Accuracy: {}%",
        result.score(),
        result.total(),
        result.accuracy_percent()
    );
    if result.unanswered() > 0 {
        let _ = write!(out, "\nUnanswered: {}", result.unanswered());
    }
    out
}

/// Run one test interactively on stdin/stdout until it completes or input ends.
///
/// # Errors
///
/// Returns an error if the test cannot be loaded or stdin fails.
pub async fn run(storage: &Storage, clock: Clock, test_id: TestId) -> anyhow::Result<()> {
    let service = QuizSessionService::new(clock, Arc::new(StorageQuestionSet::from_storage(storage)));
    let test = storage
        .tests
        .get_test(test_id)
        .await?
        .with_context(|| format!("test {test_id} not found"))?;
    let mut quiz = service
        .start_session(test_id)
        .await?
        .with_observer(Box::new(CountdownPrinter));

    println!("{}", test.name());
    if let Some(limit) = test.time_limit() {
        println!("Time limit: {} minutes", limit.minutes());
    }
    prompt(&render_question(quiz.session()))?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while !quiz.session().is_complete() {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    debug!("stdin closed before completion");
                    break;
                };
                handle_line(&mut quiz, line.trim())?;
            }
            Some(tick) = quiz.next_timer_event(), if quiz.is_timer_running() => {
                if tick == SessionTick::Expired {
                    break;
                }
            }
        }
    }

    if let Some(result) = quiz.result()? {
        println!("{}", render_result(&result));
    }
    Ok(())
}

fn prompt(text: &str) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn handle_line(quiz: &mut services::ActiveQuiz, input: &str) -> anyhow::Result<()> {
    if quiz.session().current_selection().is_none() {
        let Some(choice) = OptionIndex::parse_label(input) else {
            return prompt("Please enter A, B, C or D: ");
        };
        let feedback = quiz.select_option(choice.value())?;
        println!("{}", render_feedback(&feedback, quiz.session().is_last_question()));
        return Ok(());
    }

    match quiz.advance() {
        Ok(Advance::Next(_)) => prompt(&render_question(quiz.session()))?,
        Ok(Advance::Completed) => {}
        Err(QuizError::Session(e)) => println!("{e}"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
