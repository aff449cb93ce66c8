//! The `mdquiz history` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, Table};

use mdquiz_core::history::HistoryStore;
use mdquiz_core::timer::format_duration;
use mdquiz_store::{load_config_from, FileStorage, MdquizConfig};

/// Open the configured history store.
pub(crate) fn open_store(config_path: Option<PathBuf>) -> Result<HistoryStore<FileStorage>> {
    let config: MdquizConfig = load_config_from(config_path.as_deref())?;
    Ok(HistoryStore::load(
        config.storage(),
        config.quiz.storage_key.clone(),
        config.quiz.history_cap,
    ))
}

pub fn execute(format: String, config_path: Option<PathBuf>) -> Result<()> {
    let store = open_store(config_path)?;
    let history = store.history();

    match format.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(history.entries())
                .context("failed to serialize history")?;
            println!("{json}");
        }
        "text" => {
            if history.is_empty() {
                println!("No attempts recorded yet.");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_header(vec!["#", "Date", "Score", "Result", "Correct", "Time"]);
            for (i, session) in history.entries().iter().enumerate() {
                let color = if session.is_passed() {
                    Color::Green
                } else {
                    Color::Red
                };
                table.add_row(vec![
                    Cell::new(i + 1),
                    Cell::new(&session.date),
                    Cell::new(format!("{}%", session.score)),
                    Cell::new(session.status).fg(color),
                    Cell::new(format!(
                        "{}/{}",
                        session.correct_count(),
                        session.total_questions
                    )),
                    Cell::new(
                        session
                            .time_spent
                            .map(format_duration)
                            .unwrap_or_else(|| "-".to_string()),
                    ),
                ]);
            }
            println!("{table}");
            println!("{} of at most {} attempts kept.", history.len(), history.cap());
        }
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }

    Ok(())
}

pub fn clear(config_path: Option<PathBuf>) -> Result<()> {
    let mut store = open_store(config_path)?;
    let count = store.history().len();
    store.clear();
    println!("Cleared {count} attempt(s).");
    Ok(())
}
