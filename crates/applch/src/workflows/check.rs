use std::num::NonZeroUsize;
use std::path::PathBuf;

use chrono::NaiveDate;
use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use super::{
    announce_roster, load_requirements, on_off, requirements_label, warn_slug_collisions,
};
use crate::ai::{
    attachment_for, AiError, ChatCompletion, ChatMessage, ChatRequest, ContentPart, SearchMode,
};
use crate::config::ModelConfig;
use crate::documents::{scan_folder, SourceDocument};
use crate::progress::{BatchSummary, ItemLabel, ProgressEvent, ProgressSink};
use crate::prompts::{background_check_prompt, inline_text_documents};
use crate::roster::{slug_to_display, Applicant, Roster};
use crate::sanitize::strip_reasoning;
use crate::workspace::{Workspace, WorkspaceError};

const NO_DOCUMENTS: &str = "No PDF, image, or text files found";

#[derive(Debug, Clone, Copy)]
pub struct CheckOptions {
    pub date: NaiveDate,
    /// Overrides the configured in-flight limit for this run.
    pub concurrency: Option<NonZeroUsize>,
}

#[derive(Debug)]
pub enum CheckOutcome {
    Completed { documents: usize, output: PathBuf },
    Skipped { reason: String },
    Failed { documents: usize, error: CheckFailure },
}

#[derive(Debug, thiserror::Error)]
pub enum CheckFailure {
    #[error(transparent)]
    Ai(#[from] AiError),
    #[error("unable to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("document scan aborted: {0}")]
    Scan(String),
}

#[derive(Debug, Default)]
pub struct CheckReport {
    pub outcomes: Vec<(Applicant, CheckOutcome)>,
    pub summary: BatchSummary,
}

#[derive(Debug, thiserror::Error)]
pub enum CheckRunError {
    #[error(transparent)]
    Roster(#[from] WorkspaceError),
    #[error("No names provided via CLI and names.json is empty.")]
    NoApplicants,
}

struct CheckContext<'a, C: ?Sized> {
    workspace: &'a Workspace,
    client: &'a C,
    model: &'a str,
    search_mode: SearchMode,
    requirements: Option<&'a str>,
    date: NaiveDate,
    sink: &'a dyn ProgressSink,
}

/// Run a background check for every applicant concurrently.
///
/// Each applicant resolves independently: a skipped folder or failed request
/// never cancels the others. Outcomes come back in roster order.
pub async fn run<C>(
    workspace: &Workspace,
    models: &ModelConfig,
    client: &C,
    names: Option<Vec<String>>,
    options: CheckOptions,
    sink: &dyn ProgressSink,
) -> Result<CheckReport, CheckRunError>
where
    C: ChatCompletion + ?Sized,
{
    let requirements = load_requirements(workspace, sink);
    let roster = Roster::resolve(names, workspace)?;
    if roster.is_empty() {
        return Err(CheckRunError::NoApplicants);
    }
    announce_roster(&roster, sink);
    warn_slug_collisions(&roster.applicants, sink);

    sink.report(ProgressEvent::BatchStarted {
        title: "Background Checks".to_string(),
        subtitle: format!(
            "Model: {} | Pro Search: {} | Requirements: {}",
            models.check_model,
            on_off(models.check_pro_search),
            requirements_label(requirements.as_deref())
        ),
        items: roster
            .applicants
            .iter()
            .map(|a| ItemLabel::new(a.slug.clone(), a.name.clone()))
            .collect(),
    });

    let ctx = CheckContext {
        workspace,
        client,
        model: &models.check_model,
        search_mode: SearchMode::from_pro_flag(models.check_pro_search),
        requirements: requirements.as_deref(),
        date: options.date,
        sink,
    };
    let limiter = options
        .concurrency
        .or(models.check_concurrency)
        .map(|limit| Semaphore::new(limit.get()));

    let outcomes = join_all(roster.applicants.iter().map(|applicant| {
        let ctx = &ctx;
        let limiter = limiter.as_ref();
        async move {
            let _permit = match limiter {
                Some(semaphore) => semaphore.acquire().await.ok(),
                None => None,
            };
            check_applicant(ctx, applicant).await
        }
    }))
    .await;

    let mut report = CheckReport::default();
    for (applicant, outcome) in roster.applicants.into_iter().zip(outcomes) {
        match &outcome {
            CheckOutcome::Completed { .. } => report.summary.succeeded += 1,
            CheckOutcome::Skipped { .. } => report.summary.skipped += 1,
            CheckOutcome::Failed { .. } => report.summary.failed += 1,
        }
        report.outcomes.push((applicant, outcome));
    }

    sink.report(ProgressEvent::BatchFinished {
        summary: report.summary,
    });
    Ok(report)
}

async fn check_applicant<C>(ctx: &CheckContext<'_, C>, applicant: &Applicant) -> CheckOutcome
where
    C: ChatCompletion + ?Sized,
{
    let key = applicant.slug.clone();
    ctx.sink.report(ProgressEvent::ItemStarted { key: key.clone() });

    let folder = ctx.workspace.applicant_dir(&applicant.slug);
    let documents = match tokio::task::spawn_blocking(move || scan_folder(&folder)).await {
        Ok(documents) => documents,
        Err(err) => {
            let error = CheckFailure::Scan(err.to_string());
            ctx.sink.report(ProgressEvent::ItemFailed {
                key,
                error: error.to_string(),
            });
            return CheckOutcome::Failed {
                documents: 0,
                error,
            };
        }
    };

    if documents.is_empty() {
        info!(applicant = %applicant.name, "no documents; skipping");
        ctx.sink.report(ProgressEvent::ItemSkipped {
            key,
            reason: NO_DOCUMENTS.to_string(),
        });
        return CheckOutcome::Skipped {
            reason: NO_DOCUMENTS.to_string(),
        };
    }

    let count = documents.len();
    match request_and_store(ctx, applicant, &documents).await {
        Ok(output) => {
            info!(applicant = %applicant.name, documents = count, path = %output.display(), "check stored");
            ctx.sink.report(ProgressEvent::ItemSucceeded {
                key,
                detail: Some(format!("({count} file(s))")),
            });
            CheckOutcome::Completed {
                documents: count,
                output,
            }
        }
        Err(error) => {
            warn!(applicant = %applicant.name, %error, "check failed");
            ctx.sink.report(ProgressEvent::ItemFailed {
                key,
                error: error.to_string(),
            });
            CheckOutcome::Failed {
                documents: count,
                error,
            }
        }
    }
}

async fn request_and_store<C>(
    ctx: &CheckContext<'_, C>,
    applicant: &Applicant,
    documents: &[SourceDocument],
) -> Result<PathBuf, CheckFailure>
where
    C: ChatCompletion + ?Sized,
{
    let request = build_request(ctx, applicant, documents);
    let reply = ctx.client.complete(request).await?;

    let path = ctx.workspace.result_path(&applicant.slug);
    tokio::fs::write(&path, strip_reasoning(&reply))
        .await
        .map_err(|source| CheckFailure::Write {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}

fn build_request<C: ?Sized>(
    ctx: &CheckContext<'_, C>,
    applicant: &Applicant,
    documents: &[SourceDocument],
) -> ChatRequest {
    let file_names: Vec<String> = documents.iter().map(|doc| doc.name.clone()).collect();
    let mut prompt = background_check_prompt(
        &slug_to_display(&applicant.slug),
        &file_names,
        ctx.requirements,
        ctx.date,
    );
    prompt.push_str(&inline_text_documents(documents));

    let mut parts = vec![ContentPart::text(prompt)];
    parts.extend(documents.iter().filter_map(attachment_for));

    ChatRequest {
        model: ctx.model.to_string(),
        search_mode: ctx.search_mode,
        messages: vec![ChatMessage::user(parts)],
    }
}
