//! The `mdquiz review` command.

use std::path::PathBuf;

use anyhow::Result;

use mdquiz_report::{html, markdown, save_json, text, write_file};

use super::history::open_store;

pub fn execute(
    index: usize,
    format: String,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let store = open_store(config_path)?;
    let history = store.history();
    let Some(session) = index.checked_sub(1).and_then(|i| history.get(i)) else {
        anyhow::bail!(
            "no attempt #{index} in history ({} recorded)",
            history.len()
        );
    };

    let rendered = match format.as_str() {
        "text" => text::review(session),
        "markdown" | "md" => markdown::to_markdown(session),
        "html" => {
            if let Some(path) = &output {
                html::write_html_review(session, path)?;
                println!("Saved {}", path.display());
                return Ok(());
            }
            html::generate_html(session)
        }
        "json" => {
            if let Some(path) = &output {
                save_json(session, path)?;
                println!("Saved {}", path.display());
                return Ok(());
            }
            serde_json::to_string_pretty(session)?
        }
        other => {
            anyhow::bail!("unknown format: {other} (expected text, markdown, html or json)")
        }
    };

    match output {
        Some(path) => {
            write_file(&path, &rendered)?;
            println!("Saved {}", path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}
