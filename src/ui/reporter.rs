use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Mutex;

use applch::progress::{BatchSummary, NoticeLevel, ProgressEvent, ProgressSink};
use colored::Colorize;

/// Human-readable progress: a header per batch, one status line per item and
/// a closing tally.
pub struct TerminalReporter<W> {
    out: Mutex<W>,
    labels: Mutex<HashMap<String, String>>,
}

impl TerminalReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            labels: Mutex::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn label(&self, key: &str) -> String {
        self.labels
            .lock()
            .ok()
            .and_then(|labels| labels.get(key).cloned())
            .unwrap_or_else(|| key.to_string())
    }

    fn line(&self, text: String) {
        if let Ok(mut out) = self.out.lock() {
            // Output is best effort; a closed pipe must not abort the run.
            let _ = writeln!(out, "{text}");
        }
    }
}

impl<W: Write + Send> ProgressSink for TerminalReporter<W> {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::BatchStarted {
                title,
                subtitle,
                items,
            } => {
                if let Ok(mut labels) = self.labels.lock() {
                    labels.extend(items.into_iter().map(|item| (item.key, item.label)));
                }
                self.line(format!("\n{}", title.bold().cyan()));
                self.line(format!("{}\n", subtitle.dimmed()));
            }
            ProgressEvent::ItemStarted { key } => {
                self.line(format!("  {} {}...", "›".dimmed(), self.label(&key)));
            }
            ProgressEvent::ItemSucceeded { key, detail } => {
                let detail = detail
                    .map(|d| format!(" {}", d.dimmed()))
                    .unwrap_or_default();
                self.line(format!("  {} {}{detail}", "✓".green(), self.label(&key)));
            }
            ProgressEvent::ItemFailed { key, error } => {
                self.line(format!(
                    "  {} {}: {}",
                    "✗".red(),
                    self.label(&key),
                    error.red()
                ));
            }
            ProgressEvent::ItemSkipped { key, reason } => {
                self.line(format!(
                    "  {} {}: {}",
                    "⚠".yellow(),
                    self.label(&key),
                    reason.yellow()
                ));
            }
            ProgressEvent::Notice { level, message } => {
                let symbol = match level {
                    NoticeLevel::Info => "ℹ".blue(),
                    NoticeLevel::Warning => "⚠".yellow(),
                    NoticeLevel::Error => "✗".red(),
                };
                self.line(format!("{symbol} {message}"));
            }
            ProgressEvent::BatchFinished { summary } => {
                self.line(tally(&summary));
            }
        }
    }
}

fn tally(summary: &BatchSummary) -> String {
    let mut parts = vec![format!("Completed: {}", summary.succeeded)
        .green()
        .to_string()];
    if summary.skipped > 0 {
        parts.push(format!("Skipped: {}", summary.skipped).yellow().to_string());
    }
    if summary.failed > 0 {
        parts.push(format!("Failed: {}", summary.failed).red().to_string());
    }
    format!("\n{}", parts.join("  "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use applch::progress::ItemLabel;

    fn rendered(events: Vec<ProgressEvent>) -> String {
        colored::control::set_override(false);
        let reporter = TerminalReporter::new(Vec::new());
        for event in events {
            reporter.report(event);
        }
        String::from_utf8(reporter.into_inner()).expect("utf8")
    }

    #[test]
    fn items_are_shown_by_label() {
        let output = rendered(vec![
            ProgressEvent::BatchStarted {
                title: "Background Checks".to_string(),
                subtitle: "Model: sonar | Pro Search: off | Requirements: none".to_string(),
                items: vec![ItemLabel::new("jane-doe", "Jane Doe")],
            },
            ProgressEvent::ItemSucceeded {
                key: "jane-doe".to_string(),
                detail: Some("(2 file(s))".to_string()),
            },
        ]);

        assert!(output.contains("Background Checks"));
        assert!(output.contains("✓ Jane Doe (2 file(s))"));
    }

    #[test]
    fn tally_lists_only_nonzero_issue_counts() {
        let output = rendered(vec![ProgressEvent::BatchFinished {
            summary: BatchSummary {
                succeeded: 2,
                skipped: 1,
                failed: 0,
            },
        }]);

        assert!(output.contains("Completed: 2"));
        assert!(output.contains("Skipped: 1"));
        assert!(!output.contains("Failed"));
    }

    #[test]
    fn notices_carry_level_symbols() {
        let output = rendered(vec![
            ProgressEvent::warning("Missing results for: Ann Lee"),
            ProgressEvent::info("Loaded 2 name(s) from names.json"),
        ]);

        assert!(output.contains("⚠ Missing results for: Ann Lee"));
        assert!(output.contains("ℹ Loaded 2 name(s) from names.json"));
    }
}
