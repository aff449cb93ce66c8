//! Markdown review, suitable for pasting into notes or issues.

use mdquiz_core::model::QuizSession;
use mdquiz_core::timer::format_duration;

use crate::review::review_items;

/// Render a finished session as Markdown.
pub fn to_markdown(session: &QuizSession) -> String {
    let mut md = String::new();

    md.push_str(&format!("## Quiz attempt {}\n\n", session.date));
    md.push_str(&format!(
        "**Result:** {} | **Score:** {}% ({}/{} correct)",
        session.status,
        session.score,
        session.correct_count(),
        session.total_questions
    ));
    if let Some(secs) = session.time_spent {
        md.push_str(&format!(" | **Time:** {}", format_duration(secs)));
    }
    md.push_str("\n\n");

    md.push_str("| # | Question | Result |\n");
    md.push_str("|---|----------|--------|\n");
    let items = review_items(session);
    for item in &items {
        md.push_str(&format!(
            "| {} | {} | {} |\n",
            item.position,
            escape_cell(&first_line(&item.question.text)),
            item.outcome.label()
        ));
    }
    md.push('\n');

    for item in &items {
        md.push_str(&format!(
            "### {}. {}\n\n",
            item.position,
            first_line(&item.question.text)
        ));
        for opt in &item.options {
            let check = if opt.selected { "x" } else { " " };
            let suffix = if opt.is_correct { " ✅" } else { "" };
            md.push_str(&format!("- [{check}] {}. {}{suffix}\n", opt.letter, opt.text));
        }
        md.push('\n');
    }

    md
}

fn first_line(text: &str) -> String {
    text.lines().next().unwrap_or_default().trim().to_string()
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}
