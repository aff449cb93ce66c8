//! Configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use mdquiz_core::config::QuizConfig;

use crate::file::FileStorage;

/// Top-level mdquiz configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MdquizConfig {
    /// Quiz rules: duration, sample size, pass threshold, history.
    #[serde(default)]
    pub quiz: QuizConfig,
    /// Directory holding persisted history. `${VAR}` references are expanded.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".local").join("share").join("mdquiz"))
        .unwrap_or_else(|| PathBuf::from("./.mdquiz"))
}

impl Default for MdquizConfig {
    fn default() -> Self {
        Self {
            quiz: QuizConfig::default(),
            data_dir: default_data_dir(),
        }
    }
}

impl MdquizConfig {
    /// File storage rooted at the configured data directory.
    pub fn storage(&self) -> FileStorage {
        FileStorage::new(&self.data_dir)
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
    }
    result
}

/// Apply `MDQUIZ_*` overrides using `lookup` to read variables.
fn apply_overrides(config: &mut MdquizConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(dir) = lookup("MDQUIZ_DATA_DIR").filter(|d| !d.is_empty()) {
        config.data_dir = PathBuf::from(dir);
    }

    if let Some(raw) = lookup("MDQUIZ_DURATION_SECS") {
        match raw.trim().parse::<u32>() {
            Ok(secs) if secs > 0 => config.quiz.duration_secs = secs,
            _ => tracing::warn!("ignoring invalid MDQUIZ_DURATION_SECS '{}'", raw),
        }
    }

    let resolved = resolve_env_vars(&config.data_dir.to_string_lossy());
    config.data_dir = PathBuf::from(resolved);
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `mdquiz.toml` in the current directory
/// 2. `~/.config/mdquiz/config.toml`
///
/// Environment variable overrides: `MDQUIZ_DATA_DIR`, `MDQUIZ_DURATION_SECS`.
pub fn load_config() -> Result<MdquizConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<MdquizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("mdquiz.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!("using config {}", path.display());
            toml::from_str::<MdquizConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => MdquizConfig::default(),
    };

    apply_overrides(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("mdquiz"))
}
