//! Applicant names, folder slugs, and roster resolution.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::workspace::{Workspace, WorkspaceError};

/// Canonical folder/file key for a display name: lowercase, whitespace runs
/// collapsed to a single hyphen.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut in_whitespace = false;
    for ch in lowered.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            slug.push(ch);
            in_whitespace = false;
        }
    }
    slug
}

/// Presentation name for a slug. Lossy: punctuation, acronyms and original
/// casing are not recovered.
pub fn slug_to_display(slug: &str) -> String {
    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split positional arguments on commas, trimming and dropping empties.
/// Returns `None` when nothing usable was given.
pub fn parse_names<S: AsRef<str>>(args: &[S]) -> Option<Vec<String>> {
    let names: Vec<String> = args
        .iter()
        .flat_map(|arg| arg.as_ref().split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    if names.is_empty() {
        None
    } else {
        Some(names)
    }
}

/// A named applicant and the slug keying their folder and result file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Applicant {
    pub name: String,
    pub slug: String,
}

impl Applicant {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self { name, slug }
    }
}

/// Where a roster came from; callers report it differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterSource {
    Arguments,
    NamesFile,
}

#[derive(Debug, Clone)]
pub struct Roster {
    pub applicants: Vec<Applicant>,
    pub source: RosterSource,
}

impl Roster {
    /// Names given on the command line win; otherwise `data/names.json`.
    /// Blank entries are dropped and repeated names kept once, in first-seen
    /// order, so no two applicants write the same result file concurrently.
    pub fn resolve(
        names: Option<Vec<String>>,
        workspace: &Workspace,
    ) -> Result<Self, WorkspaceError> {
        let (names, source) = match names {
            Some(names) if !names.is_empty() => (names, RosterSource::Arguments),
            _ => (workspace.load_names()?, RosterSource::NamesFile),
        };
        let mut applicants: Vec<Applicant> = Vec::with_capacity(names.len());
        for name in names {
            if name.trim().is_empty() || applicants.iter().any(|a| a.name == name) {
                continue;
            }
            applicants.push(Applicant::new(name));
        }
        Ok(Self { applicants, source })
    }

    pub fn is_empty(&self) -> bool {
        self.applicants.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.applicants.iter().map(|a| a.name.clone()).collect()
    }
}

/// Distinct display names that share a slug, and therefore a folder and
/// result file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugCollision {
    pub slug: String,
    pub names: Vec<String>,
}

pub fn slug_collisions(applicants: &[Applicant]) -> Vec<SlugCollision> {
    let mut by_slug: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for applicant in applicants {
        let names = by_slug.entry(applicant.slug.as_str()).or_default();
        if !names.contains(&applicant.name.as_str()) {
            names.push(applicant.name.as_str());
        }
    }

    by_slug
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|(slug, names)| SlugCollision {
            slug: slug.to_string(),
            names: names.into_iter().map(str::to_string).collect(),
        })
        .collect()
}
