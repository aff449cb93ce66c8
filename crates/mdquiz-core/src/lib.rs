//! mdquiz-core — Markup question parser, session engine, and attempt history.
//!
//! This crate turns loosely formatted markdown into a bank of multiple-choice
//! questions, runs timed sessions over random samples of that bank, and keeps
//! a capped history of finished attempts behind a pluggable [`storage::Storage`].

pub mod app;
pub mod bank;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod ids;
pub mod model;
pub mod parser;
pub mod shuffle;
pub mod storage;
pub mod timer;

pub use app::{Action, AppState, Event, View};
pub use bank::QuestionBank;
pub use config::QuizConfig;
pub use engine::{ActiveSession, SessionEngine};
pub use error::{QuizError, StorageError};
pub use history::{History, HistoryStore};
pub use model::{AnswerOption, OptionId, Question, QuestionId, QuizSession, SessionStatus, UserAnswer};
pub use storage::{MemoryStorage, Storage};
