//! The `mdquiz validate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use mdquiz_core::bank::QuestionBank;
use mdquiz_core::config::QuizConfig;
use mdquiz_core::engine::SessionEngine;
use mdquiz_core::error::QuizError;
use mdquiz_core::parser::{load_markup, SkipReason, SkippedBlock};

pub fn execute(file: PathBuf) -> Result<()> {
    let text = load_markup(&file)?;
    let mut engine = SessionEngine::new(QuizConfig::default());
    let outcome = engine.parse(&text);

    if outcome.questions.is_empty() {
        return Err(QuizError::NoQuestions).with_context(|| file.display().to_string());
    }

    let bank = QuestionBank::new(outcome.questions);
    println!(
        "Question bank: {} ({} questions, {} multiple-choice)",
        file.display(),
        bank.len(),
        bank.multiple_choice_count()
    );

    // Only the text before the first header can lack one.
    let (preamble, skipped): (Vec<&SkippedBlock>, Vec<&SkippedBlock>) = outcome
        .skipped
        .iter()
        .partition(|s| s.reason == SkipReason::MissingHeader);
    if !preamble.is_empty() {
        println!("  Text before the first question is ignored.");
    }

    for block in &skipped {
        let prefix = block
            .question_number
            .map(|n| format!("  [Question {n}]"))
            .unwrap_or_else(|| format!("  [block {}]", block.block_index));
        println!("{prefix} WARNING: {}", block.reason);
    }

    if skipped.is_empty() {
        println!("All question blocks valid.");
    } else {
        println!("\n{} block(s) skipped.", skipped.len());
    }

    Ok(())
}
