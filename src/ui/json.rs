use std::io::{self, Write};
use std::sync::Mutex;

use applch::progress::{ProgressEvent, ProgressSink};
use serde::Serialize;

/// One JSON object per line, for scripts driving the CLI.
pub struct JsonLinesReporter<W> {
    out: Mutex<W>,
}

impl JsonLinesReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> JsonLinesReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Write any serializable record on its own line.
    pub fn emit<T: Serialize>(&self, record: &T) {
        let Ok(line) = serde_json::to_string(record) else {
            return;
        };
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{line}");
        }
    }
}

impl<W: Write + Send> ProgressSink for JsonLinesReporter<W> {
    fn report(&self, event: ProgressEvent) {
        self.emit(&event);
    }
}
