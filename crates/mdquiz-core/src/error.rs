//! Quiz and storage error types.
//!
//! `QuizError` covers caller mistakes and recoverable failures in the
//! parse → bank → session pipeline. The interactive front end prevents most
//! of them by construction; the engine still rejects them so state is never
//! corrupted.
//!
//! `StorageError` is defined here rather than in `mdquiz-store` so the
//! history store can handle backend failures without knowing the backend.

use thiserror::Error;

use crate::model::OptionId;

/// Errors produced by the question bank and session engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// The input was non-empty but no valid question could be recovered.
    #[error("no valid questions found, check the markdown formatting")]
    NoQuestions,

    /// A session was requested from an empty question bank.
    #[error("cannot start a session from an empty question bank")]
    EmptyBank,

    /// A session was requested with a sample size of zero.
    #[error("sample size must be at least 1")]
    InvalidSampleSize,

    /// An answer was submitted without selecting any option.
    #[error("an answer needs at least one selected option")]
    EmptySelection,

    /// An answer was submitted for a question other than the next unanswered one.
    #[error("expected an answer for question {expected}, got {got}")]
    AnswerOutOfOrder { expected: usize, got: usize },

    /// A selected option does not belong to the question being answered.
    #[error("option {0} does not belong to this question")]
    UnknownOption(OptionId),

    /// Every question in the session already has an answer.
    #[error("all questions in this session have been answered")]
    SessionComplete,
}

impl QuizError {
    /// Returns `true` if the error is a user-input problem the UI should simply ignore.
    pub fn is_input_rejection(&self) -> bool {
        matches!(
            self,
            QuizError::EmptySelection
                | QuizError::AnswerOutOfOrder { .. }
                | QuizError::UnknownOption(_)
                | QuizError::SessionComplete
        )
    }
}

/// Errors raised by a [`Storage`](crate::storage::Storage) backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the underlying medium failed.
    #[error("storage I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The key cannot be mapped onto the backend (e.g. contains a path separator).
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_rejections_are_classified() {
        assert!(QuizError::EmptySelection.is_input_rejection());
        assert!(QuizError::AnswerOutOfOrder {
            expected: 0,
            got: 3
        }
        .is_input_rejection());
        assert!(!QuizError::NoQuestions.is_input_rejection());
        assert!(!QuizError::EmptyBank.is_input_rejection());
    }

    #[test]
    fn messages_are_user_readable() {
        let err = QuizError::AnswerOutOfOrder {
            expected: 2,
            got: 5,
        };
        assert_eq!(err.to_string(), "expected an answer for question 2, got 5");
    }

    #[test]
    fn storage_error_keeps_source() {
        use std::error::Error as _;
        let err = StorageError::Io {
            key: "history".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("history"));
        assert!(err.source().is_some());
    }
}
