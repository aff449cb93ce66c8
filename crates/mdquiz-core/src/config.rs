//! Quiz rules.

use serde::{Deserialize, Serialize};

/// Tunable quiz rules. Every field has a default so partial TOML tables work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Time allowed for one session, in seconds.
    #[serde(default = "default_duration")]
    pub duration_secs: u32,
    /// Maximum number of questions drawn into a session.
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
    /// Minimum score (percent) needed to pass.
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: u32,
    /// Maximum number of finalized sessions kept in history.
    #[serde(default = "default_history_cap")]
    pub history_cap: usize,
    /// Storage key the history list is saved under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_duration() -> u32 {
    60 * 60
}
fn default_sample_size() -> usize {
    40
}
fn default_pass_threshold() -> u32 {
    80
}
fn default_history_cap() -> usize {
    50
}
fn default_storage_key() -> String {
    "mcq_quiz_history_v4".to_string()
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_duration(),
            sample_size: default_sample_size(),
            pass_threshold: default_pass_threshold(),
            history_cap: default_history_cap(),
            storage_key: default_storage_key(),
        }
    }
}
