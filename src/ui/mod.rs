//! Presentation of progress events and stored reports.

mod json;
mod markdown;
mod reporter;

use std::io::IsTerminal;

use colored::Colorize;
use dialoguer::Confirm;

pub use json::JsonLinesReporter;
pub use markdown::render_markdown;
pub use reporter::TerminalReporter;

const RULE_WIDTH: usize = 60;

/// Frame a stored report for the terminal: a rule, the title, a rule, then
/// the rendered markdown.
pub fn format_report(title: &str, markdown: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!(
        "\n{rule}\n📄 {}\n{rule}\n\n{}",
        title.bold(),
        render_markdown(markdown)
    )
}

/// Ask before a destructive action. Without an interactive terminal the
/// answer is "no".
pub fn confirm(prompt: &str) -> bool {
    if !std::io::stdin().is_terminal() {
        return false;
    }
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .unwrap_or(false)
}
