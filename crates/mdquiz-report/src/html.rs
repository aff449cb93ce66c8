//! HTML review generator.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use anyhow::Result;
use std::path::Path;

use mdquiz_core::model::QuizSession;
use mdquiz_core::timer::format_duration;

use crate::review::{review_items, Outcome};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML review of a finished session.
pub fn generate_html(session: &QuizSession) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>mdquiz review: {}</title>\n",
        html_escape(&session.date)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    let status_class = if session.is_passed() { "pass" } else { "fail" };
    html.push_str("<header>\n");
    html.push_str("<h1>Quiz review</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">{} | {} questions",
        html_escape(&session.date),
        session.total_questions
    ));
    if let Some(secs) = session.time_spent {
        html.push_str(&format!(" | {}", format_duration(secs)));
    }
    html.push_str("</p>\n");
    html.push_str(&format!(
        "<p class=\"score {}\"><strong>{}%</strong> {} ({}/{} correct)</p>\n",
        status_class,
        session.score,
        session.status,
        session.correct_count(),
        session.total_questions
    ));
    html.push_str("</header>\n");

    // Questions
    html.push_str("<section class=\"questions\">\n");
    for item in review_items(session) {
        let class = match item.outcome {
            Outcome::Correct => "pass",
            Outcome::Incorrect => "fail",
            Outcome::Unanswered => "skip",
        };
        html.push_str(&format!("<article class=\"{class}\">\n"));
        html.push_str(&format!(
            "<h2>{}. <span class=\"badge\">{}</span></h2>\n",
            item.position,
            item.outcome.label()
        ));
        html.push_str(&format!(
            "<p class=\"question\">{}</p>\n",
            html_escape(&item.question.text).replace('\n', "<br>")
        ));
        if item.question.is_multiple_choice {
            html.push_str("<p class=\"hint\">Select all that apply</p>\n");
        }

        html.push_str("<ul>\n");
        for opt in &item.options {
            let mut classes = Vec::new();
            if opt.is_correct {
                classes.push("correct");
            }
            if opt.selected {
                classes.push("selected");
            }
            html.push_str(&format!(
                "<li class=\"{}\"><span class=\"letter\">{}</span> {}</li>\n",
                classes.join(" "),
                opt.letter,
                html_escape(opt.text)
            ));
        }
        html.push_str("</ul>\n</article>\n");
    }
    html.push_str("</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML review to a file.
pub fn write_html_review(session: &QuizSession, path: &Path) -> Result<()> {
    crate::write_file(path, &generate_html(session))
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; --skip: #f3f4f6; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; --skip: #1f2937; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0 auto; max-width: 48rem; padding: 2rem; background: var(--bg); color: var(--fg); }
.meta { color: #6b7280; }
.score { font-size: 1.5rem; padding: 0.5rem 1rem; border-radius: 8px; }
article { border: 1px solid var(--border); border-left-width: 6px; border-radius: 8px; padding: 0 1rem 1rem; margin: 1rem 0; }
article.pass { border-left-color: #22c55e; }
article.fail { border-left-color: #ef4444; }
article.skip { border-left-color: #9ca3af; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
article.pass, article.fail, article.skip { background: none; }
.badge { font-size: 0.8rem; text-transform: uppercase; color: #6b7280; }
.hint { font-style: italic; color: #6b7280; }
ul { list-style: none; padding: 0; }
li { padding: 0.4rem 0.8rem; margin: 0.25rem 0; border-radius: 6px; border: 1px solid var(--border); }
li.correct { background: var(--pass); }
li.selected:not(.correct) { background: var(--fail); }
li.selected { font-weight: bold; }
.letter { display: inline-block; width: 1.5rem; font-family: 'JetBrains Mono', 'Fira Code', monospace; }
"#;
