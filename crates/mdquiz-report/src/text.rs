//! Plain-text renderings for the terminal.

use mdquiz_core::model::QuizSession;
use mdquiz_core::timer::format_duration;

use crate::review::{review_items, Outcome};

/// Short result block shown when a session ends.
pub fn summary(session: &QuizSession) -> String {
    let mut out = String::new();
    let verdict = if session.is_passed() {
        "PASSED"
    } else {
        "FAILED"
    };

    out.push_str(&format!("Result: {verdict}\n"));
    out.push_str(&format!(
        "Score: {}% ({}/{} correct)\n",
        session.score,
        session.correct_count(),
        session.total_questions
    ));
    if let Some(secs) = session.time_spent {
        out.push_str(&format!("Time spent: {}\n", format_duration(secs)));
    }
    let unanswered = session.unanswered_count();
    if unanswered > 0 {
        out.push_str(&format!("Unanswered: {unanswered}\n"));
    }
    out.push_str(&format!("Taken: {}\n", session.date));
    out
}

/// Question-by-question review with selected and correct options marked.
///
/// `>` marks a selected option and `*` marks a correct one.
pub fn review(session: &QuizSession) -> String {
    let mut out = summary(session);

    for item in review_items(session) {
        let tag = match item.outcome {
            Outcome::Correct => "[ok]",
            Outcome::Incorrect => "[x]",
            Outcome::Unanswered => "[-]",
        };
        out.push_str(&format!(
            "\n{} {}. (Q{}) {}\n",
            tag, item.position, item.question.original_index, item.question.text
        ));
        for opt in &item.options {
            let selected = if opt.selected { '>' } else { ' ' };
            let correct = if opt.is_correct { '*' } else { ' ' };
            out.push_str(&format!("  {selected}{correct} {}. {}\n", opt.letter, opt.text));
        }
    }
    out
}
