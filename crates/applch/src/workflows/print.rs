use crate::results::{all_results, latest_arena, result_for_name, StoredReport};
use crate::workspace::Workspace;

/// What `applch print` was asked to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintTarget {
    All,
    Arena,
    Applicant(String),
}

impl PrintTarget {
    /// `arena` (any case) selects the latest arena report; any other text is
    /// an applicant name.
    pub fn parse(target: Option<&str>) -> Self {
        match target.map(str::trim) {
            None | Some("") => Self::All,
            Some(t) if t.eq_ignore_ascii_case("arena") => Self::Arena,
            Some(t) => Self::Applicant(t.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrintError {
    #[error("No results found. Run 'applch check' and 'applch arena' first.")]
    NothingStored,
    #[error("No arena results found. Run 'applch arena' first.")]
    NoArena,
    #[error("No results found for \"{0}\". Run 'applch check \"{0}\"' first.")]
    NoResultFor(String),
}

/// Stored reports matching `target`, in display order. `All` lists every
/// check result followed by the latest arena report.
pub fn select(
    workspace: &Workspace,
    target: &PrintTarget,
) -> Result<Vec<StoredReport>, PrintError> {
    match target {
        PrintTarget::All => {
            let mut reports = all_results(workspace);
            reports.extend(latest_arena(workspace));
            if reports.is_empty() {
                Err(PrintError::NothingStored)
            } else {
                Ok(reports)
            }
        }
        PrintTarget::Arena => latest_arena(workspace)
            .map(|report| vec![report])
            .ok_or(PrintError::NoArena),
        PrintTarget::Applicant(name) => result_for_name(workspace, name)
            .map(|report| vec![report])
            .ok_or_else(|| PrintError::NoResultFor(name.clone())),
    }
}
