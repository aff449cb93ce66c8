//! mdquiz-store — Persistence and configuration.
//!
//! Provides a file-backed [`Storage`](mdquiz_core::storage::Storage)
//! implementation for attempt history and the TOML configuration loader
//! used by the CLI.

pub mod config;
pub mod file;

pub use config::{load_config, load_config_from, MdquizConfig};
pub use file::FileStorage;
pub use mdquiz_core::error::StorageError;
