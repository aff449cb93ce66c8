//! The `mdquiz take` command.
//!
//! Runs one timed session in the terminal. Stdin lines and one-second timer
//! ticks are multiplexed on the current-thread runtime and both are fed to
//! the application state as actions. Stdin is read on a plain thread since a
//! blocking read cannot be cancelled and would hold up runtime shutdown.

use std::io::BufRead;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use mdquiz_core::app::{Action, AppState, Event, View, NO_QUESTIONS_NOTICE};
use mdquiz_core::engine::SessionEngine;
use mdquiz_core::model::OptionId;
use mdquiz_core::parser::load_markup;
use mdquiz_core::storage::Storage;
use mdquiz_core::timer::format_clock;
use mdquiz_report::review::option_letter;
use mdquiz_store::load_config_from;

/// How the loop should proceed after one input line.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Finished,
    Abandoned,
}

pub async fn execute(
    file: PathBuf,
    sample: Option<usize>,
    duration: Option<u32>,
    seed: Option<u64>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(n) = sample {
        config.quiz.sample_size = n;
    }
    if let Some(secs) = duration {
        config.quiz.duration_secs = secs;
    }
    anyhow::ensure!(config.quiz.sample_size > 0, "--sample must be at least 1");
    anyhow::ensure!(config.quiz.duration_secs > 0, "--duration must be at least 1");

    let text = load_markup(&file)?;
    let storage = config.storage();
    let engine = match seed {
        Some(seed) => SessionEngine::seeded(config.quiz.clone(), seed),
        None => SessionEngine::new(config.quiz.clone()),
    };
    let mut app = AppState::new(engine, storage);

    match app.update(Action::LoadMarkup(text)) {
        Event::BankLoaded { questions, skipped } => {
            println!("Loaded {questions} question(s) from {}", file.display());
            if skipped > 0 {
                println!("({skipped} block(s) skipped, run `mdquiz validate` for details)");
            }
        }
        _ => {
            let notice = app.notice().unwrap_or(NO_QUESTIONS_NOTICE).to_string();
            return Err(anyhow::anyhow!(notice)).with_context(|| file.display().to_string());
        }
    }

    app.update(Action::Start);
    if let Some(active) = app.active() {
        println!(
            "{} question(s), {} to finish. Type option letters (e.g. `b` or `a,c`), \
             Enter to continue, `exit` to quit.",
            active.session().total_questions,
            format_clock(active.duration_secs())
        );
    }
    print_question(&app);

    let mut lines = spawn_stdin_reader();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.tick().await;
    let mut warned = false;

    let flow = loop {
        tokio::select! {
            _ = ticker.tick() => {
                match app.update(Action::Tick) {
                    Event::Finished { .. } => {
                        println!("\nTime is up!");
                        break Flow::Finished;
                    }
                    Event::Changed if app.countdown().is_urgent() && !warned => {
                        warned = true;
                        println!("\n{} left!", format_clock(app.countdown().remaining()));
                    }
                    _ => {}
                }
            }
            line = lines.recv() => {
                let Some(line) = line.transpose().context("failed to read from stdin")? else {
                    app.update(Action::RequestExit);
                    app.update(Action::ConfirmExit);
                    break Flow::Abandoned;
                };
                match handle_line(&mut app, line.trim()) {
                    Flow::Continue => {}
                    done => break done,
                }
            }
        }
    };

    tracing::debug!("take loop ended: {:?}", flow);
    match flow {
        Flow::Abandoned => println!("Session abandoned. Nothing was recorded."),
        _ => {
            if let Some(session) = app.finished() {
                println!("\n{}", mdquiz_report::text::summary(session));
                println!("Run `mdquiz review` to go through your answers.");
            }
        }
    }
    Ok(())
}

fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<std::io::Result<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn handle_line<S: Storage>(app: &mut AppState<S>, input: &str) -> Flow {
    if app.exit_prompt() {
        if matches!(input.to_ascii_lowercase().as_str(), "y" | "yes") {
            app.update(Action::ConfirmExit);
            return Flow::Abandoned;
        }
        app.update(Action::CancelExit);
        print_question(app);
        return Flow::Continue;
    }

    if matches!(input.to_ascii_lowercase().as_str(), "exit" | "quit") {
        app.update(Action::RequestExit);
        println!("Leave the quiz? Your progress will be lost. [y/N]");
        return Flow::Continue;
    }

    if input.is_empty() {
        if !app.is_answered() {
            println!("Select an option first.");
            return Flow::Continue;
        }
        return match app.update(Action::Next) {
            Event::Finished { .. } => Flow::Finished,
            _ => {
                print_question(app);
                Flow::Continue
            }
        };
    }

    if app.is_answered() {
        println!("Press Enter for the next question.");
        return Flow::Continue;
    }

    let ids = match resolve_letters(app, input) {
        Ok(ids) => ids,
        Err(message) => {
            println!("{message}");
            return Flow::Continue;
        }
    };
    for id in ids {
        app.update(Action::ToggleOption(id));
    }

    match app.update(Action::Confirm) {
        Event::Graded { correct: true } => {
            println!("{}", app.praise().unwrap_or("Correct!"));
        }
        Event::Graded { correct: false } => {
            println!("Incorrect. Correct answer: {}", correct_letters(app));
        }
        _ => {}
    }
    println!("Press Enter to continue.");
    Flow::Continue
}

/// Map typed letters (`b`, `a,c`, `ac`, `A C`) onto option ids of the current question.
fn resolve_letters<S: Storage>(app: &AppState<S>, input: &str) -> Result<Vec<OptionId>, String> {
    let question = app.current_question().ok_or("No question is active.")?;

    let mut ids: Vec<OptionId> = Vec::new();
    for c in input.chars().filter(|c| !c.is_whitespace() && *c != ',') {
        let index = c
            .is_ascii_alphabetic()
            .then(|| (c.to_ascii_uppercase() as u8 - b'A') as usize)
            .filter(|i| *i < question.options.len())
            .ok_or_else(|| format!("`{c}` is not one of the options."))?;
        let id = question.options[index].id.clone();
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    if ids.is_empty() {
        return Err("Type the letter of an option.".to_string());
    }
    if !question.is_multiple_choice && ids.len() > 1 {
        return Err("Choose exactly one option.".to_string());
    }
    Ok(ids)
}

fn correct_letters<S: Storage>(app: &AppState<S>) -> String {
    let Some(question) = app.current_question() else {
        return String::new();
    };
    question
        .options
        .iter()
        .enumerate()
        .filter(|(_, o)| o.is_correct)
        .map(|(i, _)| option_letter(i).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_question<S: Storage>(app: &AppState<S>) {
    if app.view() != View::Quiz {
        return;
    }
    let (Some(active), Some(question)) = (app.active(), app.current_question()) else {
        return;
    };

    let clock = format_clock(app.countdown().remaining());
    let urgent = if app.countdown().is_urgent() { " !" } else { "" };
    println!(
        "\nQuestion {}/{}  [{clock}{urgent}]",
        active.current_index() + 1,
        active.session().total_questions
    );
    println!("{}", question.text);
    if question.is_multiple_choice {
        println!("(select all that apply)");
    }
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}. {}", option_letter(i), option.text);
    }
}
