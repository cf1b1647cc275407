//! User-facing operations. Each orchestrator drives the classifier, prompt
//! builders, AI client and result store for one command and reports progress
//! through a [`ProgressSink`].

pub mod arena;
pub mod bootstrap;
pub mod check;
pub mod clear;
pub mod print;

use tracing::warn;

use crate::progress::{ProgressEvent, ProgressSink};
use crate::roster::{slug_collisions, Applicant, Roster, RosterSource};
use crate::workspace::Workspace;

pub use arena::{ArenaError, ArenaReport};
pub use bootstrap::{BootstrapError, BootstrapReport};
pub use check::{CheckFailure, CheckOptions, CheckOutcome, CheckReport, CheckRunError};
pub use clear::ClearOutcome;
pub use print::{PrintError, PrintTarget};

fn requirements_label(requirements: Option<&str>) -> &'static str {
    if requirements.is_some() {
        "loaded"
    } else {
        "none"
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

/// Load `REQUIREMENTS.md` and announce it when present.
fn load_requirements(workspace: &Workspace, sink: &dyn ProgressSink) -> Option<String> {
    let requirements = workspace.load_requirements();
    if requirements.is_some() {
        sink.report(ProgressEvent::info(
            "Loaded job requirements from REQUIREMENTS.md",
        ));
    }
    requirements
}

fn announce_roster(roster: &Roster, sink: &dyn ProgressSink) {
    if roster.source == RosterSource::NamesFile {
        sink.report(ProgressEvent::info(format!(
            "Loaded {} name(s) from names.json",
            roster.applicants.len()
        )));
    }
}

/// Distinct names sharing a slug write to the same folder and result file;
/// surface that rather than silently merging.
fn warn_slug_collisions(applicants: &[Applicant], sink: &dyn ProgressSink) {
    for collision in slug_collisions(applicants) {
        warn!(slug = %collision.slug, names = ?collision.names, "applicant names share a folder");
        sink.report(ProgressEvent::warning(format!(
            "{} share the folder '{}'; their documents and results will be merged",
            collision.names.join(", "),
            collision.slug
        )));
    }
}
