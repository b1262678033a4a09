use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::{QuestionId, TestId};

/// Every question offers exactly this many options.
pub const OPTION_COUNT: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("a question needs exactly {} options, got {len}", OPTION_COUNT)]
    OptionCount { len: usize },

    #[error("option {} cannot be empty", OptionIndex::label_for(*index))]
    EmptyOption { index: usize },

    #[error("correct option must be between 0 and 3, got {0}")]
    CorrectOptionOutOfRange(i64),
}

//
// ─── OPTION INDEX ──────────────────────────────────────────────────────────────
//

/// Zero-based position of an answer among a question's options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct OptionIndex(u8);

impl OptionIndex {
    /// Returns `None` when `index` does not address one of the options.
    #[must_use]
    pub fn new(index: usize) -> Option<Self> {
        if index < OPTION_COUNT {
            u8::try_from(index).ok().map(Self)
        } else {
            None
        }
    }

    /// Parses a letter (`A`-`D`, any case) or a 1-based digit (`1`-`4`).
    #[must_use]
    pub fn parse_label(raw: &str) -> Option<Self> {
        let mut chars = raw.trim().chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        match c.to_ascii_uppercase() {
            l @ 'A'..='D' => Self::new(usize::from(l as u8 - b'A')),
            d @ '1'..='4' => Self::new(usize::from(d as u8 - b'1')),
            _ => None,
        }
    }

    #[must_use]
    pub fn value(self) -> usize {
        usize::from(self.0)
    }

    /// Display letter for the option: `A` for index 0, `B` for 1, ...
    #[must_use]
    pub fn label(self) -> char {
        Self::label_for(self.value())
    }

    fn label_for(index: usize) -> char {
        u8::try_from(index)
            .ok()
            .and_then(|i| b'A'.checked_add(i))
            .map_or('?', char::from)
    }

    /// All valid option indices in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..OPTION_COUNT).filter_map(Self::new)
    }
}

impl TryFrom<i64> for OptionIndex {
    type Error = QuestionError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        usize::try_from(raw)
            .ok()
            .and_then(Self::new)
            .ok_or(QuestionError::CorrectOptionOutOfRange(raw))
    }
}

impl From<OptionIndex> for u8 {
    fn from(index: OptionIndex) -> Self {
        index.0
    }
}

impl fmt::Display for OptionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question with a single correct option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    test_id: TestId,
    text: String,
    options: [String; OPTION_COUNT],
    correct_option: OptionIndex,
    explanation: Option<String>,
}

impl Question {
    /// Creates a question.
    ///
    /// Text and options are trimmed; a blank explanation becomes `None`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is empty, the option count is not
    /// exactly [`OPTION_COUNT`], or any option is blank.
    pub fn new(
        id: QuestionId,
        test_id: TestId,
        text: impl Into<String>,
        options: Vec<String>,
        correct_option: OptionIndex,
        explanation: Option<String>,
    ) -> Result<Self, QuestionError> {
        let text = text.into().trim().to_owned();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }

        let len = options.len();
        let options: Vec<String> = options.into_iter().map(|o| o.trim().to_owned()).collect();
        if let Some(index) = options.iter().position(String::is_empty) {
            return Err(QuestionError::EmptyOption { index });
        }
        let options: [String; OPTION_COUNT] = options
            .try_into()
            .map_err(|_| QuestionError::OptionCount { len })?;

        let explanation = explanation
            .map(|e| e.trim().to_owned())
            .filter(|e| !e.is_empty());

        Ok(Self {
            id,
            test_id,
            text,
            options,
            correct_option,
            explanation,
        })
    }

    /// Returns a copy with a storage-assigned identifier.
    #[must_use]
    pub fn with_id(mut self, id: QuestionId) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn test_id(&self) -> TestId {
        self.test_id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: OptionIndex) -> &str {
        &self.options[index.value()]
    }

    #[must_use]
    pub fn correct_option(&self) -> OptionIndex {
        self.correct_option
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    #[must_use]
    pub fn is_correct(&self, selected: OptionIndex) -> bool {
        self.correct_option == selected
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn options(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn builds_valid_question() {
        let q = Question::new(
            QuestionId::new(1),
            TestId::new(1),
            "Which country hosted the G7 Summit in 2023?",
            options(&["United States", "Japan", "Germany", "Italy"]),
            OptionIndex::new(1).unwrap(),
            Some("Hiroshima, May 2023.".into()),
        )
        .unwrap();

        assert_eq!(q.option(q.correct_option()), "Japan");
        assert!(q.is_correct(OptionIndex::new(1).unwrap()));
        assert!(!q.is_correct(OptionIndex::new(0).unwrap()));
    }

    #[test]
    fn rejects_wrong_option_count() {
        let err = Question::new(
            QuestionId::new(1),
            TestId::new(1),
            "Q",
            options(&["a", "b", "c"]),
            OptionIndex::new(0).unwrap(),
            None,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::OptionCount { len: 3 });
    }

    #[test]
    fn rejects_blank_option() {
        let err = Question::new(
            QuestionId::new(1),
            TestId::new(1),
            "Q",
            options(&["a", "b", " ", "d"]),
            OptionIndex::new(0).unwrap(),
            None,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::EmptyOption { index: 2 });
        assert_eq!(err.to_string(), "option C cannot be empty");
    }

    #[test]
    fn blank_explanation_is_dropped() {
        let q = Question::new(
            QuestionId::new(1),
            TestId::new(1),
            "Q",
            options(&["a", "b", "c", "d"]),
            OptionIndex::new(3).unwrap(),
            Some("   ".into()),
        )
        .unwrap();
        assert_eq!(q.explanation(), None);
    }

    #[test]
    fn option_index_bounds() {
        assert!(OptionIndex::new(3).is_some());
        assert!(OptionIndex::new(4).is_none());
        assert_eq!(
            OptionIndex::try_from(-1),
            Err(QuestionError::CorrectOptionOutOfRange(-1))
        );
    }

    #[test]
    fn option_labels() {
        assert_eq!(OptionIndex::new(0).unwrap().label(), 'A');
        assert_eq!(OptionIndex::new(3).unwrap().to_string(), "D");
        assert_eq!(OptionIndex::parse_label("b"), OptionIndex::new(1));
        assert_eq!(OptionIndex::parse_label("4"), OptionIndex::new(3));
        assert_eq!(OptionIndex::parse_label("E"), None);
        assert_eq!(OptionIndex::parse_label("AB"), None);
    }
}
