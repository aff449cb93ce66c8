//! Core data model types for mdquiz.
//!
//! These are the types every other module passes around: answer options,
//! parsed questions, user answers, and quiz sessions.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Opaque identifier of an option, unique within its question.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(String);

impl OptionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of a question, unique across a bank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One selectable answer of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Identifier, unique within the owning question.
    pub id: OptionId,
    /// Display text with emphasis markers stripped.
    pub text: String,
    /// Whether this option is part of the correct answer set.
    pub is_correct: bool,
}

/// A validated multiple-choice question.
///
/// Created once by the parser and never mutated afterward. Option order is
/// randomized at creation and fixed for the life of the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier.
    pub id: QuestionId,
    /// Question number as written in the source, or the block index as a fallback.
    pub original_index: u64,
    /// Question body, multi-line content joined with single spaces.
    pub text: String,
    /// Options in display order.
    pub options: Vec<AnswerOption>,
    /// True iff more than one option is correct.
    pub is_multiple_choice: bool,
}

impl Question {
    /// Ids of every correct option, in display order.
    pub fn correct_option_ids(&self) -> impl Iterator<Item = &OptionId> {
        self.options
            .iter()
            .filter(|o| o.is_correct)
            .map(|o| &o.id)
    }

    /// Look up an option by id.
    pub fn option(&self, id: &OptionId) -> Option<&AnswerOption> {
        self.options.iter().find(|o| &o.id == id)
    }

    /// Correct-set grading: the set of selected ids must equal the correct set.
    ///
    /// A correct subset of a multi-answer question fails, and repeating one
    /// correct id does not stand in for another.
    pub fn grade(&self, selected: &[OptionId]) -> bool {
        let correct: HashSet<&OptionId> = self.correct_option_ids().collect();
        let chosen: HashSet<&OptionId> = selected.iter().collect();
        chosen == correct
    }
}

/// The user's submitted answer to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAnswer {
    /// The question this answers.
    pub question_id: QuestionId,
    /// Selected option ids in the order the user picked them.
    pub selected_option_ids: Vec<OptionId>,
    /// Grading result computed at submission time.
    pub is_correct: bool,
}

/// Pass/fail outcome of a finalized session.
///
/// Persisted as `"Passed"`/`"Failed"`, the form existing history records use.
/// The upper-case spelling is still read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    #[serde(alias = "PASSED")]
    Passed,
    #[serde(alias = "FAILED")]
    Failed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Passed => write!(f, "Passed"),
            SessionStatus::Failed => write!(f, "Failed"),
        }
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "passed" | "pass" => Ok(SessionStatus::Passed),
            "failed" | "fail" => Ok(SessionStatus::Failed),
            other => Err(format!("unknown session status: {other}")),
        }
    }
}

/// One timed attempt over a fixed, ordered subset of the bank.
///
/// While active the session only grows by appended answers; once finalized it
/// is an immutable record suitable for the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSession {
    /// Unique session identifier.
    pub id: String,
    /// Human-readable local start time.
    pub date: String,
    /// Questions in session order.
    pub questions: Vec<Question>,
    /// Answers in submission order.
    #[serde(default)]
    pub user_answers: Vec<UserAnswer>,
    /// Integer percentage, 0 until finalized.
    #[serde(default)]
    pub score: u32,
    /// Number of questions in the session.
    pub total_questions: usize,
    /// Outcome; `Failed` is a placeholder until finalized.
    pub status: SessionStatus,
    /// Seconds actually used, set at finalization.
    #[serde(default)]
    pub time_spent: Option<u32>,
}

impl QuizSession {
    /// Number of answers graded correct.
    pub fn correct_count(&self) -> usize {
        self.user_answers.iter().filter(|a| a.is_correct).count()
    }

    /// The answer recorded for a question, if any.
    pub fn answer_for(&self, question_id: &QuestionId) -> Option<&UserAnswer> {
        self.user_answers
            .iter()
            .find(|a| &a.question_id == question_id)
    }

    /// True once every question has an answer.
    pub fn is_complete(&self) -> bool {
        self.user_answers.len() >= self.total_questions
    }

    /// Questions that never received an answer (e.g. after a timeout).
    pub fn unanswered_count(&self) -> usize {
        self.total_questions.saturating_sub(self.user_answers.len())
    }

    pub fn is_passed(&self) -> bool {
        self.status == SessionStatus::Passed
    }
}
