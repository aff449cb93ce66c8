//! mdquiz CLI — timed multiple-choice quizzes from markdown files.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "mdquiz",
    version,
    about = "Timed multiple-choice quizzes from markdown question banks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a timed quiz
    Take {
        /// Markdown question bank
        #[arg(long)]
        file: PathBuf,

        /// Number of questions drawn into the session
        #[arg(long)]
        sample: Option<usize>,

        /// Time limit in seconds
        #[arg(long)]
        duration: Option<u32>,

        /// Seed for reproducible question and option order
        #[arg(long)]
        seed: Option<u64>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check a question bank and report skipped blocks
    Validate {
        /// Markdown question bank
        #[arg(long)]
        file: PathBuf,
    },

    /// List past attempts
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Review a past attempt question by question
    Review {
        /// Attempt number as listed by `mdquiz history` (1 = most recent)
        #[arg(default_value = "1")]
        index: usize,

        /// Output format: text, markdown, html, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example question bank
    Init,
}

#[derive(Subcommand)]
enum HistoryAction {
    /// Delete all recorded attempts
    Clear,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mdquiz=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Take {
            file,
            sample,
            duration,
            seed,
            config,
        } => commands::take::execute(file, sample, duration, seed, config).await,
        Commands::Validate { file } => commands::validate::execute(file),
        Commands::History {
            action: Some(HistoryAction::Clear),
            config,
            ..
        } => commands::history::clear(config),
        Commands::History {
            action: None,
            format,
            config,
        } => commands::history::execute(format, config),
        Commands::Review {
            index,
            format,
            output,
            config,
        } => commands::review::execute(index, format, output, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
