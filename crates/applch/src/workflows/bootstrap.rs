use std::fs;
use std::path::PathBuf;

use tracing::info;

use super::{announce_roster, warn_slug_collisions};
use crate::progress::{BatchSummary, ItemLabel, ProgressEvent, ProgressSink};
use crate::roster::{Applicant, Roster, RosterSource};
use crate::workspace::{Workspace, WorkspaceError};

#[derive(Debug)]
pub struct FolderOutcome {
    pub applicant: Applicant,
    pub path: PathBuf,
    pub result: Result<(), std::io::Error>,
}

#[derive(Debug, Default)]
pub struct BootstrapReport {
    pub folders: Vec<FolderOutcome>,
    pub summary: BatchSummary,
}

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Roster(#[from] WorkspaceError),
}

/// Create one folder per applicant. Names given on the command line replace
/// the stored roster first. Folders are created one at a time and a failure
/// only marks that applicant.
pub fn run(
    workspace: &Workspace,
    names: Option<Vec<String>>,
    sink: &dyn ProgressSink,
) -> Result<BootstrapReport, BootstrapError> {
    let roster = Roster::resolve(names, workspace)?;

    if roster.source == RosterSource::Arguments {
        sink.report(ProgressEvent::info(format!(
            "Using {} name(s) from command-line arguments",
            roster.applicants.len()
        )));
        workspace.save_names(&roster.names())?;
        sink.report(ProgressEvent::info(format!(
            "Saved {} name(s) to names.json for future runs",
            roster.applicants.len()
        )));
    } else {
        announce_roster(&roster, sink);
    }

    if roster.is_empty() {
        sink.report(ProgressEvent::info(
            "No applicants found. Add names to names.json or provide them as arguments.",
        ));
        return Ok(BootstrapReport::default());
    }

    warn_slug_collisions(&roster.applicants, sink);

    sink.report(ProgressEvent::BatchStarted {
        title: "Bootstrap".to_string(),
        subtitle: "Creating folders for applicants".to_string(),
        items: roster
            .applicants
            .iter()
            .map(|a| ItemLabel::new(a.name.clone(), a.name.clone()))
            .collect(),
    });

    let mut report = BootstrapReport::default();
    for applicant in roster.applicants {
        sink.report(ProgressEvent::ItemStarted {
            key: applicant.name.clone(),
        });

        let path = workspace.applicant_dir(&applicant.slug);
        let result = fs::create_dir_all(&path);
        match &result {
            Ok(()) => {
                report.summary.succeeded += 1;
                info!(applicant = %applicant.name, path = %path.display(), "applicant folder ready");
                sink.report(ProgressEvent::ItemSucceeded {
                    key: applicant.name.clone(),
                    detail: Some(path.display().to_string()),
                });
            }
            Err(err) => {
                report.summary.failed += 1;
                sink.report(ProgressEvent::ItemFailed {
                    key: applicant.name.clone(),
                    error: err.to_string(),
                });
            }
        }

        report.folders.push(FolderOutcome {
            applicant,
            path,
            result,
        });
    }

    sink.report(ProgressEvent::BatchFinished {
        summary: report.summary,
    });
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{NoticeLevel, RecordingSink};
    use tempfile::TempDir;

    fn workspace() -> (TempDir, Workspace) {
        let dir = TempDir::new().expect("tempdir");
        let workspace = Workspace::new(dir.path());
        workspace.ensure_setup().expect("setup");
        (dir, workspace)
    }

    #[test]
    fn argument_names_are_saved_and_folders_created() {
        let (_dir, workspace) = workspace();
        let sink = RecordingSink::new();

        let report = run(
            &workspace,
            Some(vec!["Jane Doe".to_string(), "John Smith".to_string()]),
            &sink,
        )
        .expect("bootstrap runs");

        assert_eq!(report.summary.succeeded, 2);
        assert!(workspace.applicant_dir("jane-doe").is_dir());
        assert!(workspace.applicant_dir("john-smith").is_dir());
        assert_eq!(
            workspace.load_names().expect("names"),
            vec!["Jane Doe".to_string(), "John Smith".to_string()]
        );
    }

    #[test]
    fn existing_folders_are_not_an_error() {
        let (_dir, workspace) = workspace();
        fs::create_dir_all(workspace.applicant_dir("jane-doe")).expect("pre-create");
        workspace
            .save_names(&["Jane Doe".to_string()])
            .expect("save names");
        let sink = RecordingSink::new();

        let report = run(&workspace, None, &sink).expect("bootstrap runs");

        assert_eq!(report.summary.succeeded, 1);
        assert_eq!(report.summary.failed, 0);
        assert_eq!(
            sink.notices(NoticeLevel::Info),
            vec!["Loaded 1 name(s) from names.json".to_string()]
        );
    }

    #[test]
    fn empty_roster_creates_nothing() {
        let (_dir, workspace) = workspace();
        let sink = RecordingSink::new();

        let report = run(&workspace, None, &sink).expect("bootstrap runs");

        assert!(report.folders.is_empty());
        assert!(sink
            .events()
            .iter()
            .all(|event| !matches!(event, ProgressEvent::BatchStarted { .. })));
    }

    #[test]
    fn blocked_folder_fails_only_that_applicant() {
        let (_dir, workspace) = workspace();
        fs::write(workspace.applicant_dir("jane-doe"), "not a directory").expect("block path");
        let sink = RecordingSink::new();

        let report = run(
            &workspace,
            Some(vec!["Jane Doe".to_string(), "John Smith".to_string()]),
            &sink,
        )
        .expect("bootstrap runs");

        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.summary.succeeded, 1);
        assert!(report.folders[0].result.is_err());
        assert!(workspace.applicant_dir("john-smith").is_dir());
    }
}
