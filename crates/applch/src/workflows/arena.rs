use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::info;

use super::{
    announce_roster, load_requirements, on_off, requirements_label, warn_slug_collisions,
};
use crate::ai::{AiError, ChatCompletion, ChatMessage, ChatRequest, ContentPart, SearchMode};
use crate::config::ModelConfig;
use crate::progress::{BatchSummary, ItemLabel, ProgressEvent, ProgressSink};
use crate::prompts::arena_prompt;
use crate::results::{arena_file_name, load_results};
use crate::roster::Roster;
use crate::sanitize::strip_reasoning;
use crate::workspace::{Workspace, WorkspaceError};

const LOAD_STEP: &str = "load";
const ANALYSIS_STEP: &str = "analysis";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArenaReport {
    pub output: PathBuf,
    pub candidates: Vec<String>,
    pub missing: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    #[error(transparent)]
    Roster(#[from] WorkspaceError),
    #[error("No names provided via CLI and names.json is empty.")]
    NoApplicants,
    #[error("No results found. Run 'applch check' first.")]
    NoResults,
    #[error("Failed to generate arena analysis: {0}")]
    Ai(#[from] AiError),
    #[error("Failed to generate arena analysis: empty response")]
    EmptyReply,
    #[error("unable to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Rank every applicant with a stored check result in a single request and
/// write the analysis to `results/arena/arena-<date>.md`.
pub async fn run<C>(
    workspace: &Workspace,
    models: &ModelConfig,
    client: &C,
    names: Option<Vec<String>>,
    date: NaiveDate,
    sink: &dyn ProgressSink,
) -> Result<ArenaReport, ArenaError>
where
    C: ChatCompletion + ?Sized,
{
    let requirements = load_requirements(workspace, sink);
    let roster = Roster::resolve(names, workspace)?;
    if roster.is_empty() {
        return Err(ArenaError::NoApplicants);
    }
    announce_roster(&roster, sink);
    warn_slug_collisions(&roster.applicants, sink);

    sink.report(ProgressEvent::BatchStarted {
        title: "Candidate Arena".to_string(),
        subtitle: format!(
            "Model: {} | Pro Search: {} | Requirements: {}",
            models.arena_model,
            on_off(models.arena_pro_search),
            requirements_label(requirements.as_deref())
        ),
        items: vec![
            ItemLabel::new(LOAD_STEP, "Loading candidate results"),
            ItemLabel::new(ANALYSIS_STEP, "Generating arena analysis"),
        ],
    });
    let mut summary = BatchSummary::default();

    sink.report(ProgressEvent::ItemStarted {
        key: LOAD_STEP.to_string(),
    });
    let (candidates, missing) = load_results(workspace, &roster.applicants);
    if candidates.is_empty() {
        summary.failed += 1;
        sink.report(ProgressEvent::ItemFailed {
            key: LOAD_STEP.to_string(),
            error: "no stored check results".to_string(),
        });
        sink.report(ProgressEvent::BatchFinished { summary });
        return Err(ArenaError::NoResults);
    }
    summary.succeeded += 1;
    sink.report(ProgressEvent::ItemSucceeded {
        key: LOAD_STEP.to_string(),
        detail: Some(format!(
            "{}/{} loaded",
            candidates.len(),
            roster.applicants.len()
        )),
    });
    if !missing.is_empty() {
        sink.report(ProgressEvent::warning(format!(
            "Missing results for: {}",
            missing.join(", ")
        )));
    }

    sink.report(ProgressEvent::ItemStarted {
        key: ANALYSIS_STEP.to_string(),
    });
    let request = ChatRequest {
        model: models.arena_model.clone(),
        search_mode: SearchMode::from_pro_flag(models.arena_pro_search),
        messages: vec![ChatMessage::user(vec![ContentPart::text(arena_prompt(
            &candidates,
            requirements.as_deref(),
            date,
        ))])],
    };

    let outcome = analyse_and_store(workspace, client, request, date).await;
    match &outcome {
        Ok(path) => {
            summary.succeeded += 1;
            sink.report(ProgressEvent::ItemSucceeded {
                key: ANALYSIS_STEP.to_string(),
                detail: Some(path.display().to_string()),
            });
        }
        Err(err) => {
            summary.failed += 1;
            sink.report(ProgressEvent::ItemFailed {
                key: ANALYSIS_STEP.to_string(),
                error: err.to_string(),
            });
        }
    }
    sink.report(ProgressEvent::BatchFinished { summary });

    let output = outcome?;
    info!(path = %output.display(), candidates = candidates.len(), "arena stored");
    Ok(ArenaReport {
        output,
        candidates: candidates.into_iter().map(|c| c.name).collect(),
        missing,
    })
}

async fn analyse_and_store<C>(
    workspace: &Workspace,
    client: &C,
    request: ChatRequest,
    date: NaiveDate,
) -> Result<PathBuf, ArenaError>
where
    C: ChatCompletion + ?Sized,
{
    let reply = client.complete(request).await?;
    if reply.trim().is_empty() {
        return Err(ArenaError::EmptyReply);
    }

    let dir = workspace.arena_results_dir();
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|source| ArenaError::Write {
            path: dir.clone(),
            source,
        })?;

    let path = dir.join(arena_file_name(date));
    tokio::fs::write(&path, strip_reasoning(&reply))
        .await
        .map_err(|source| ArenaError::Write {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}
