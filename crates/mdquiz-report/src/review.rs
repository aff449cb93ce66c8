//! Per-question breakdown shared by every renderer.

use mdquiz_core::model::{Question, QuizSession};
use mdquiz_core::parser::MAX_OPTIONS;

/// How a question ended up in a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
    /// Time ran out before the question was answered.
    Unanswered,
}

impl Outcome {
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Correct => "correct",
            Outcome::Incorrect => "incorrect",
            Outcome::Unanswered => "unanswered",
        }
    }
}

/// One option as the user saw it, with its letter in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionMark<'a> {
    pub letter: char,
    pub text: &'a str,
    pub is_correct: bool,
    pub selected: bool,
}

/// One question of a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem<'a> {
    /// 1-based position in the session.
    pub position: usize,
    pub question: &'a Question,
    pub outcome: Outcome,
    pub options: Vec<OptionMark<'a>>,
}

/// Display letter for the `index`-th option: `A`, `B`, ...
///
/// The parser rejects questions with more than [`MAX_OPTIONS`] options, so
/// every index has its own letter. Anything past `Z` shows as `?`.
pub fn option_letter(index: usize) -> char {
    if index < MAX_OPTIONS {
        (b'A' + index as u8) as char
    } else {
        '?'
    }
}

/// Break a session down question by question, in session order.
pub fn review_items(session: &QuizSession) -> Vec<ReviewItem<'_>> {
    session
        .questions
        .iter()
        .enumerate()
        .map(|(i, question)| {
            let answer = session.answer_for(&question.id);
            let outcome = match answer {
                Some(a) if a.is_correct => Outcome::Correct,
                Some(_) => Outcome::Incorrect,
                None => Outcome::Unanswered,
            };
            let options = question
                .options
                .iter()
                .enumerate()
                .map(|(j, opt)| OptionMark {
                    letter: option_letter(j),
                    text: &opt.text,
                    is_correct: opt.is_correct,
                    selected: answer.is_some_and(|a| a.selected_option_ids.contains(&opt.id)),
                })
                .collect();

            ReviewItem {
                position: i + 1,
                question,
                outcome,
                options,
            }
        })
        .collect()
}
