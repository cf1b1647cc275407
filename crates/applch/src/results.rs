//! Stored check and arena reports.

use std::fs;

use chrono::NaiveDate;
use serde::Serialize;

use crate::roster::{slug_to_display, slugify, Applicant};
use crate::workspace::Workspace;

const ARENA_PREFIX: &str = "arena-";
const MARKDOWN_SUFFIX: &str = ".md";

/// A check result loaded for the arena pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateReport {
    pub name: String,
    pub slug: String,
    pub content: String,
}

/// A report selected for printing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredReport {
    pub title: String,
    pub file_name: String,
    pub content: String,
}

/// `arena-YYYY-MM-DD.md`; same-day runs share a name.
pub fn arena_file_name(date: NaiveDate) -> String {
    format!("{ARENA_PREFIX}{}{MARKDOWN_SUFFIX}", date.format("%Y-%m-%d"))
}

/// Load check results for the given applicants, splitting out those that have
/// none yet.
pub fn load_results(
    workspace: &Workspace,
    applicants: &[Applicant],
) -> (Vec<CandidateReport>, Vec<String>) {
    let mut reports = Vec::new();
    let mut missing = Vec::new();

    for applicant in applicants {
        match fs::read_to_string(workspace.result_path(&applicant.slug)) {
            Ok(content) => reports.push(CandidateReport {
                name: applicant.name.clone(),
                slug: applicant.slug.clone(),
                content,
            }),
            Err(_) => missing.push(applicant.name.clone()),
        }
    }

    (reports, missing)
}

pub fn result_for_name(workspace: &Workspace, name: &str) -> Option<StoredReport> {
    let slug = slugify(name);
    let content = fs::read_to_string(workspace.result_path(&slug)).ok()?;
    Some(StoredReport {
        title: name.to_string(),
        file_name: format!("{slug}{MARKDOWN_SUFFIX}"),
        content,
    })
}

/// The arena report with the greatest file name, which is the most recent
/// given the date stamp format.
pub fn latest_arena(workspace: &Workspace) -> Option<StoredReport> {
    let dir = workspace.arena_results_dir();
    let latest = fs::read_dir(&dir)
        .ok()?
        .filter_map(Result::ok)
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with(ARENA_PREFIX) && name.ends_with(MARKDOWN_SUFFIX))
        .max()?;

    let content = fs::read_to_string(dir.join(&latest)).ok()?;
    Some(StoredReport {
        title: "Arena Results".to_string(),
        file_name: latest,
        content,
    })
}

/// Every individual check result, ordered by file name.
pub fn all_results(workspace: &Workspace) -> Vec<StoredReport> {
    let dir = workspace.results_dir();
    let Ok(entries) = fs::read_dir(&dir) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(MARKDOWN_SUFFIX) && !name.starts_with("arena"))
        .collect();
    names.sort();

    names
        .into_iter()
        .filter_map(|file_name| {
            let content = fs::read_to_string(dir.join(&file_name)).ok()?;
            let slug = file_name.trim_end_matches(MARKDOWN_SUFFIX);
            Some(StoredReport {
                title: slug_to_display(slug),
                file_name,
                content,
            })
        })
        .collect()
}
