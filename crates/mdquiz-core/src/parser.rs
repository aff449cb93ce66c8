//! Markdown question parser.
//!
//! Turns a loosely formatted markdown document into validated [`Question`]s.
//! The accepted convention looks like:
//!
//! ```text
//! ### **Question 12:** Which city is the capital of France?
//! a. Berlin
//! b. **Paris**
//! **c.** Lyon
//! ```
//!
//! A header line starts each block. Plain lines before the first option form
//! the question body. Option lines are a single letter and a period; an
//! option is correct when either its letter or its whole text is wrapped in
//! `**`.

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use rand::Rng;
use regex::Regex;

use crate::ids::IdSource;
use crate::model::{AnswerOption, OptionId, Question, QuestionId};
use crate::shuffle::shuffled;

/// Start of a block. Matched against raw lines, so the header must begin the line.
static BLOCK_START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:###\s+)?\*\*Question [0-9]+[:*]*\*\*").unwrap()
});

/// Full header: question number plus any question text on the same line.
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:###\s+)?\*\*Question ([0-9]+)[:*]*\*\*\s*(.*)$").unwrap()
});

/// Anything that looks like the start of another question inside a block.
static NESTED_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:###\s+)?\*\*Question [0-9]+").unwrap());

/// Option line: optional leading `**`, one letter, a period, then the text.
static OPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\*\*)?([A-Za-z])\.\s*(.*)$").unwrap());

const EMPHASIS: &str = "**";

/// Options are answered and displayed by a single letter, so a question can
/// carry at most one per letter of the alphabet.
pub const MAX_OPTIONS: usize = 26;

/// Why a block did not produce a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Fewer than two lines after trimming; cannot hold a question and options.
    TooShort,
    /// The first line is not a question header.
    MissingHeader,
    /// Fewer than two option lines were recognized.
    TooFewOptions { found: usize },
    /// Options were found but none is marked correct.
    NoCorrectOption,
    /// More options than there are letters to label them.
    TooManyOptions { found: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooShort => write!(f, "block is too short to hold a question"),
            SkipReason::MissingHeader => write!(f, "block does not start with a question header"),
            SkipReason::TooFewOptions { found } => {
                write!(f, "found {found} option(s), at least 2 are required")
            }
            SkipReason::NoCorrectOption => write!(f, "no option is marked correct"),
            SkipReason::TooManyOptions { found } => {
                write!(f, "found {found} options, at most {MAX_OPTIONS} are supported")
            }
        }
    }
}

/// A block the parser discarded, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedBlock {
    /// Position of the block in the document (block 0 is any preamble).
    pub block_index: usize,
    /// Question number from the header, if the header was readable.
    pub question_number: Option<u64>,
    pub reason: SkipReason,
}

/// Everything the parser recovered from one document.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    /// Valid questions in document order.
    pub questions: Vec<Question>,
    /// Non-blank blocks that were discarded.
    pub skipped: Vec<SkippedBlock>,
    /// Total number of blocks, including the preamble block.
    pub block_count: usize,
}

/// Per-block walk state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockState {
    /// Plain lines extend the question body.
    CollectingText,
    /// At least one option was seen; plain lines are dropped.
    CollectingOptions,
}

/// Read a markdown question file.
///
/// Invalid UTF-8 is replaced rather than rejected. An empty file is an error.
pub fn load_markup(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read question file: {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes).into_owned();
    anyhow::ensure!(
        !text.trim().is_empty(),
        "question file is empty: {}",
        path.display()
    );
    Ok(text)
}

/// Parse a document, keeping diagnostics for every discarded block.
pub fn parse_markup<R: Rng + ?Sized>(
    text: &str,
    ids: &mut dyn IdSource,
    rng: &mut R,
) -> ParseOutcome {
    let blocks = split_blocks(text);
    let mut outcome = ParseOutcome {
        block_count: blocks.len(),
        ..Default::default()
    };

    for (block_index, block) in blocks.iter().enumerate() {
        match parse_block(block, block_index, ids, rng) {
            Ok(question) => outcome.questions.push(question),
            Err(skipped) => {
                if block.trim().is_empty() {
                    continue;
                }
                tracing::debug!("skipping block {}: {}", block_index, skipped.reason);
                outcome.skipped.push(skipped);
            }
        }
    }

    outcome
}

/// Split the document at header lines, keeping each header with the block it opens.
fn split_blocks(text: &str) -> Vec<String> {
    let normalized = format!("\n{}", text.replace("\r\n", "\n").replace('\r', "\n"));

    let mut blocks = Vec::new();
    let mut current = String::new();
    for line in normalized.split('\n') {
        if BLOCK_START_RE.is_match(line) {
            blocks.push(std::mem::take(&mut current));
        } else {
            current.push('\n');
        }
        current.push_str(line);
    }
    blocks.push(current);
    blocks
}

fn parse_block<R: Rng + ?Sized>(
    block: &str,
    block_index: usize,
    ids: &mut dyn IdSource,
    rng: &mut R,
) -> std::result::Result<Question, SkippedBlock> {
    let skip = |question_number, reason| SkippedBlock {
        block_index,
        question_number,
        reason,
    };

    let lines: Vec<&str> = block.trim().split('\n').collect();
    if lines.len() < 2 {
        return Err(skip(None, SkipReason::TooShort));
    }

    let Some(header) = HEADER_RE.captures(lines[0]) else {
        return Err(skip(None, SkipReason::MissingHeader));
    };
    // Numbers past u64::MAX are treated as unreadable and fall back to the block index.
    let question_number = header[1].parse::<u64>().ok().filter(|n| *n > 0);

    let mut body: Vec<&str> = Vec::new();
    let inline = header[2].trim();
    if !inline.is_empty() {
        body.push(inline);
    }

    let mut state = BlockState::CollectingText;
    let mut options = Vec::new();

    for (line_index, raw) in lines.iter().enumerate().skip(1) {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if NESTED_HEADER_RE.is_match(line) {
            break;
        }

        match OPTION_RE.captures(line) {
            Some(caps) => {
                state = BlockState::CollectingOptions;
                let letter = &caps[2];
                let (text, is_correct) = clean_option_text(caps.get(1).is_some(), caps[3].trim());
                options.push(AnswerOption {
                    id: OptionId::new(format!(
                        "{}-{block_index}-{line_index}",
                        letter.to_ascii_lowercase()
                    )),
                    text,
                    is_correct,
                });
            }
            None if state == BlockState::CollectingText => body.push(line),
            // Trailing commentary after the options is intentionally dropped.
            None => {}
        }
    }

    if options.len() < 2 {
        return Err(skip(
            question_number,
            SkipReason::TooFewOptions {
                found: options.len(),
            },
        ));
    }

    if options.len() > MAX_OPTIONS {
        return Err(skip(
            question_number,
            SkipReason::TooManyOptions {
                found: options.len(),
            },
        ));
    }

    let correct = options.iter().filter(|o| o.is_correct).count();
    if correct == 0 {
        return Err(skip(question_number, SkipReason::NoCorrectOption));
    }

    Ok(Question {
        id: QuestionId::new(ids.next_id("q")),
        original_index: question_number.unwrap_or(block_index as u64),
        text: body.join(" "),
        options: shuffled(&options, rng),
        is_multiple_choice: correct > 1,
    })
}

/// Strip emphasis from option text and report whether it marks a correct answer.
///
/// Leading and trailing markers are handled independently since malformed
/// input often carries only one of them.
fn clean_option_text(bold_letter: bool, content: &str) -> (String, bool) {
    let is_correct =
        bold_letter || (content.starts_with(EMPHASIS) && content.ends_with(EMPHASIS));

    let mut text = content;
    if let Some(stripped) = text.strip_suffix(EMPHASIS) {
        text = stripped.trim();
    }
    if let Some(stripped) = text.strip_prefix(EMPHASIS) {
        text = stripped.trim();
    }

    (text.to_string(), is_correct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn parse(text: &str) -> ParseOutcome {
        let mut ids = SequentialIds::new();
        let mut rng = StdRng::seed_from_u64(11);
        parse_markup(text, &mut ids, &mut rng)
    }

    fn option_texts(q: &Question) -> Vec<&str> {
        let mut texts: Vec<&str> = q.options.iter().map(|o| o.text.as_str()).collect();
        texts.sort_unstable();
        texts
    }

    #[test]
    fn parses_bold_text_marker() {
        let out = parse("**Question 1** What is the capital of France?\na. Berlin\nb. **Paris**\n");
        assert_eq!(out.questions.len(), 1);

        let q = &out.questions[0];
        assert_eq!(q.original_index, 1);
        assert_eq!(q.text, "What is the capital of France?");
        assert_eq!(q.options.len(), 2);
        assert!(!q.is_multiple_choice);

        let correct: Vec<&AnswerOption> = q.options.iter().filter(|o| o.is_correct).collect();
        assert_eq!(correct.len(), 1);
        assert_eq!(correct[0].text, "Paris");
        assert_eq!(option_texts(q), vec!["Berlin", "Paris"]);
    }

    #[test]
    fn parses_bold_letter_marker() {
        let out = parse("### **Question 3:**\nPick the prime.\n**A.** 7\nB. 8\nC. 9");
        let q = &out.questions[0];
        assert_eq!(q.original_index, 3);
        assert_eq!(q.text, "Pick the prime.");
        let correct: Vec<&str> = q
            .options
            .iter()
            .filter(|o| o.is_correct)
            .map(|o| o.text.as_str())
            .collect();
        assert_eq!(correct, vec!["7"]);
    }

    #[test]
    fn joins_multi_line_body() {
        let text = "**Question 4**\nFirst line of the body.\nSecond line.\nThird line?\na. yes\nb. **no**";
        let out = parse(text);
        assert_eq!(
            out.questions[0].text,
            "First line of the body. Second line. Third line?"
        );
    }

    #[test]
    fn header_text_and_body_are_joined() {
        let out = parse("**Question 2:** Lead in\ncontinued here\na. **x**\nb. y");
        assert_eq!(out.questions[0].text, "Lead in continued here");
    }

    #[test]
    fn rejects_block_with_one_option() {
        let out = parse("**Question 1** Only one?\na. **lonely**\n\n**Question 2** Two\na. **x**\nb. y");
        assert_eq!(out.questions.len(), 1);
        assert_eq!(out.questions[0].original_index, 2);
        assert_eq!(
            out.skipped,
            vec![SkippedBlock {
                block_index: 1,
                question_number: Some(1),
                reason: SkipReason::TooFewOptions { found: 1 },
            }]
        );
    }

    #[test]
    fn rejects_block_without_correct_option() {
        let out = parse("**Question 1** Nothing marked\na. x\nb. y");
        assert!(out.questions.is_empty());
        assert_eq!(out.skipped[0].reason, SkipReason::NoCorrectOption);
    }

    #[test]
    fn rejects_header_only_block() {
        let out = parse("**Question 1** Lonely header");
        assert!(out.questions.is_empty());
        assert_eq!(out.skipped[0].reason, SkipReason::TooShort);
    }

    #[test]
    fn option_letters_are_case_insensitive() {
        let out = parse("**Question 1** Case\nA. **upper**\na. lower\n**B.** bold\nc. plain");
        let q = &out.questions[0];
        assert_eq!(q.options.len(), 4);
        assert!(q.is_multiple_choice);
        assert_eq!(option_texts(q), vec!["bold", "lower", "plain", "upper"]);
    }

    #[test]
    fn header_is_case_insensitive() {
        let out = parse("**QUESTION 9**: Shout\na. **x**\nb. y\n\n**question 10** whisper\na. x\nb. **y**");
        assert_eq!(out.questions.len(), 2);
        assert_eq!(out.questions[1].original_index, 10);
    }

    #[test]
    fn multi_select_is_detected() {
        let out = parse("**Question 5** Pick two\na. **one**\nb. **two**\nc. three");
        let q = &out.questions[0];
        assert!(q.is_multiple_choice);
        assert_eq!(q.correct_option_ids().count(), 2);
    }

    #[test]
    fn lines_after_options_are_dropped() {
        let out = parse("**Question 1** Body\na. **x**\nb. y\nExplanation: x is right.");
        let q = &out.questions[0];
        assert_eq!(q.text, "Body");
        assert_eq!(q.options.len(), 2);
        assert!(q.options.iter().all(|o| !o.text.contains("Explanation")));
    }

    #[test]
    fn half_marked_option_is_cleaned_but_not_correct() {
        let out = parse("**Question 1** Half\na. **broken\nb. also broken**\nc. **fine**");
        let q = &out.questions[0];
        assert_eq!(option_texts(q), vec!["also broken", "broken", "fine"]);
        assert_eq!(q.correct_option_ids().count(), 1);
    }

    #[test]
    fn fallback_index_counts_blocks() {
        let text = "Preamble line\nmore preamble\n**Question 0** Zero\na. **x**\nb. y\n**Question 99999999999999999999999** Huge\na. x\nb. **y**";
        let out = parse(text);
        assert_eq!(out.block_count, 3);
        assert_eq!(out.questions.len(), 2);
        assert_eq!(out.questions[0].original_index, 1);
        assert_eq!(out.questions[1].original_index, 2);
        assert_eq!(out.skipped[0].reason, SkipReason::MissingHeader);
        assert_eq!(out.skipped[0].block_index, 0);
    }

    #[test]
    fn large_question_numbers_are_kept() {
        let out = parse("**Question 99999999999** Big\na. **x**\nb. y");
        assert_eq!(out.questions[0].original_index, 99_999_999_999);

        let out = parse("**Question 99999999999** Big\na. x\nb. y");
        assert_eq!(out.skipped[0].question_number, Some(99_999_999_999));
    }

    #[test]
    fn more_options_than_letters_is_skipped() {
        let mut text = String::from("**Question 4** Too many\n**a.** right\n");
        for _ in 0..MAX_OPTIONS {
            text.push_str("b. wrong\n");
        }
        let out = parse(&text);
        assert!(out.questions.is_empty());
        assert_eq!(out.skipped[0].question_number, Some(4));
        assert_eq!(
            out.skipped[0].reason,
            SkipReason::TooManyOptions {
                found: MAX_OPTIONS + 1
            }
        );

        let mut text = String::from("**Question 5** Just enough\n**a.** right\n");
        for _ in 1..MAX_OPTIONS {
            text.push_str("b. wrong\n");
        }
        assert_eq!(parse(&text).questions[0].options.len(), MAX_OPTIONS);
    }

    #[test]
    fn keeps_document_order_and_duplicate_numbers() {
        let text = "**Question 3** c\na. **x**\nb. y\n**Question 1** a\na. **x**\nb. y\n**Question 3** again\na. **x**\nb. y";
        let out = parse(text);
        let numbers: Vec<u64> = out.questions.iter().map(|q| q.original_index).collect();
        assert_eq!(numbers, vec![3, 1, 3]);
        let ids: Vec<&str> = out.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["q-1", "q-2", "q-3"]);
    }

    #[test]
    fn handles_crlf_and_blank_lines() {
        let out = parse("**Question 1**\r\n\r\nWhy?\r\n\r\na. **because**\r\n\r\nb. no\r\n");
        let q = &out.questions[0];
        assert_eq!(q.text, "Why?");
        assert_eq!(option_texts(q), vec!["because", "no"]);
    }

    #[test]
    fn indented_header_stops_block() {
        let text = "**Question 1** first\na. **x**\nb. y\n   **Question 2** indented\na. **z**";
        let out = parse(text);
        assert_eq!(out.block_count, 2);
        assert_eq!(out.questions.len(), 1);
        assert_eq!(option_texts(&out.questions[0]), vec!["x", "y"]);
    }

    #[test]
    fn option_ids_are_unique_within_question() {
        let out = parse("**Question 1** Dup letters\na. **x**\na. y\na. z");
        let q = &out.questions[0];
        let mut ids: Vec<&str> = q.options.iter().map(|o| o.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn empty_input_yields_nothing() {
        let out = parse("");
        assert!(out.questions.is_empty());
        assert!(out.skipped.is_empty());

        let out = parse("just some notes\nwith no questions");
        assert!(out.questions.is_empty());
        assert_eq!(out.skipped.len(), 1);
    }

    #[test]
    fn load_markup_reads_and_rejects_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.md");
        std::fs::write(&path, "**Question 1** hi\na. **x**\nb. y\n").unwrap();
        assert!(load_markup(&path).unwrap().contains("Question 1"));

        let empty = dir.path().join("empty.md");
        std::fs::write(&empty, "  \n").unwrap();
        assert!(load_markup(&empty).is_err());

        assert!(load_markup(&dir.path().join("missing.md")).is_err());
    }
}
