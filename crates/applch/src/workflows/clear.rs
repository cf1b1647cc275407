use std::fs;
use std::io;
use std::path::Path;

use tracing::{info, warn};

use crate::progress::{BatchSummary, ItemLabel, ProgressEvent, ProgressSink};
use crate::workspace::Workspace;

const DATA_STEP: &str = "data";
const RESULTS_STEP: &str = "results";
const REINIT_STEP: &str = "reinit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Cancelled,
    Completed {
        data_cleared: bool,
        results_cleared: bool,
        reinitialized: bool,
    },
}

/// Wipe `data/` and `results/` after confirmation, then recreate the
/// workspace skeleton. `.env` and `REQUIREMENTS.md` live at the root and are
/// left alone. Each step reports independently.
pub fn run(
    workspace: &Workspace,
    confirm: impl FnOnce() -> bool,
    sink: &dyn ProgressSink,
) -> ClearOutcome {
    sink.report(ProgressEvent::warning(
        "This will delete all applicant folders and results!",
    ));
    if !confirm() {
        sink.report(ProgressEvent::info("Clear cancelled."));
        return ClearOutcome::Cancelled;
    }

    sink.report(ProgressEvent::BatchStarted {
        title: "Clear Workspace".to_string(),
        subtitle: "Remove all data and results (keeps .env)".to_string(),
        items: vec![
            ItemLabel::new(DATA_STEP, "Clearing data folder"),
            ItemLabel::new(RESULTS_STEP, "Clearing results folder"),
            ItemLabel::new(REINIT_STEP, "Reinitializing workspace"),
        ],
    });
    let mut summary = BatchSummary::default();

    let data_cleared = step(sink, &mut summary, DATA_STEP, || {
        empty_dir(&workspace.data_dir())
    });
    let results_cleared = step(sink, &mut summary, RESULTS_STEP, || {
        empty_dir(&workspace.results_dir())
    });
    let reinitialized = step(sink, &mut summary, REINIT_STEP, || {
        workspace.ensure_setup().map(|_| ()).map_err(|e| e.to_string())
    });

    sink.report(ProgressEvent::BatchFinished { summary });
    if data_cleared && results_cleared && reinitialized {
        sink.report(ProgressEvent::info("Workspace cleared and reinitialized!"));
    }

    ClearOutcome::Completed {
        data_cleared,
        results_cleared,
        reinitialized,
    }
}

fn step(
    sink: &dyn ProgressSink,
    summary: &mut BatchSummary,
    key: &str,
    action: impl FnOnce() -> Result<(), String>,
) -> bool {
    sink.report(ProgressEvent::ItemStarted {
        key: key.to_string(),
    });
    match action() {
        Ok(()) => {
            summary.succeeded += 1;
            sink.report(ProgressEvent::ItemSucceeded {
                key: key.to_string(),
                detail: None,
            });
            true
        }
        Err(error) => {
            summary.failed += 1;
            warn!(step = key, %error, "clear step failed");
            sink.report(ProgressEvent::ItemFailed {
                key: key.to_string(),
                error,
            });
            false
        }
    }
}

/// Remove every entry under `dir`. A directory that does not exist is
/// already empty.
fn empty_dir(dir: &Path) -> Result<(), String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(format!("{}: {err}", dir.display())),
    };

    let mut failures = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| format!("{}: {err}", dir.display()))?;
        let path = entry.path();
        let removed = match entry.file_type() {
            Ok(ft) if ft.is_dir() => fs::remove_dir_all(&path),
            Ok(_) => fs::remove_file(&path),
            Err(err) => Err(err),
        };
        if let Err(err) = removed {
            failures.push(format!("{}: {err}", path.display()));
        }
    }

    if failures.is_empty() {
        info!(dir = %dir.display(), "cleared");
        Ok(())
    } else {
        Err(failures.join("; "))
    }
}
