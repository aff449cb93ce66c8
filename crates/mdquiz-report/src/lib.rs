//! mdquiz-report — Renderings of finished attempts.
//!
//! Turns a finalized [`QuizSession`](mdquiz_core::model::QuizSession) into a
//! terminal summary, a Markdown review, a self-contained HTML review, or JSON.

pub mod html;
pub mod markdown;
pub mod review;
pub mod text;

use std::path::Path;

use anyhow::{Context, Result};

use mdquiz_core::model::QuizSession;

pub use review::{review_items, OptionMark, Outcome, ReviewItem};

/// Save a session as pretty-printed JSON.
pub fn save_json(session: &QuizSession, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(session).context("failed to serialize session")?;
    write_file(path, &json)
}

/// Write rendered output, creating parent directories as needed.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use mdquiz_core::model::*;

    fn option(id: &str, text: &str, is_correct: bool) -> AnswerOption {
        AnswerOption {
            id: OptionId::new(id),
            text: text.into(),
            is_correct,
        }
    }

    /// Three questions: one right, one wrong, one never answered.
    pub fn session() -> QuizSession {
        let questions = vec![
            Question {
                id: QuestionId::new("q-1"),
                original_index: 1,
                text: "Capital of France?".into(),
                options: vec![option("a", "Berlin", false), option("b", "Paris", true)],
                is_multiple_choice: false,
            },
            Question {
                id: QuestionId::new("q-2"),
                original_index: 2,
                text: "Pick the <even> numbers".into(),
                options: vec![
                    option("c", "2", true),
                    option("d", "3", false),
                    option("e", "4", true),
                ],
                is_multiple_choice: true,
            },
            Question {
                id: QuestionId::new("q-3"),
                original_index: 7,
                text: "Largest planet?".into(),
                options: vec![option("f", "Jupiter", true), option("g", "Mars", false)],
                is_multiple_choice: false,
            },
        ];

        QuizSession {
            id: "session-4".into(),
            date: "2026-05-02 14:03:11".into(),
            questions,
            user_answers: vec![
                UserAnswer {
                    question_id: QuestionId::new("q-1"),
                    selected_option_ids: vec![OptionId::new("b")],
                    is_correct: true,
                },
                UserAnswer {
                    question_id: QuestionId::new("q-2"),
                    selected_option_ids: vec![OptionId::new("c")],
                    is_correct: false,
                },
            ],
            score: 33,
            total_questions: 3,
            status: SessionStatus::Failed,
            time_spent: Some(3600),
        }
    }
}
