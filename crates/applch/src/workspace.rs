use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

const DATA_DIR: &str = "data";
const RESULTS_DIR: &str = "results";
const ARENA_DIR: &str = "arena";
const NAMES_FILE: &str = "names.json";
const REQUIREMENTS_FILE: &str = "REQUIREMENTS.md";
const ENV_FILE: &str = ".env";
const CONFIG_FILE: &str = "config.json";
const README_FILE: &str = "README.md";

/// Placeholder written into a fresh `.env`; treated as "no credential".
pub const API_KEY_PLACEHOLDER: &str = "your_key_here";

const ENV_TEMPLATE: &str = "# Add your environment variables here\nPERPLEXITY_API_KEY=your_key_here\n";
const README_TEMPLATE: &str = include_str!("../templates/README.md");

/// Well-known paths of an applicant workspace rooted at a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Workspace rooted at the process working directory.
    pub fn current() -> io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR)
    }

    pub fn results_dir(&self) -> PathBuf {
        self.root.join(RESULTS_DIR)
    }

    pub fn arena_results_dir(&self) -> PathBuf {
        self.results_dir().join(ARENA_DIR)
    }

    pub fn names_path(&self) -> PathBuf {
        self.data_dir().join(NAMES_FILE)
    }

    pub fn requirements_path(&self) -> PathBuf {
        self.root.join(REQUIREMENTS_FILE)
    }

    pub fn env_path(&self) -> PathBuf {
        self.root.join(ENV_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn readme_path(&self) -> PathBuf {
        self.root.join(README_FILE)
    }

    pub fn applicant_dir(&self, slug: &str) -> PathBuf {
        self.data_dir().join(slug)
    }

    pub fn result_path(&self, slug: &str) -> PathBuf {
        self.results_dir().join(format!("{slug}.md"))
    }

    /// Create any missing directories and seed files. Existing files are never
    /// touched, so this runs before every command.
    pub fn ensure_setup(&self) -> Result<SetupReport, WorkspaceError> {
        let mut report = SetupReport::default();

        for dir in [self.data_dir(), self.results_dir(), self.arena_results_dir()] {
            if !dir.exists() {
                fs::create_dir_all(&dir).map_err(|source| WorkspaceError::Create {
                    path: dir.clone(),
                    source,
                })?;
                report.created.push(dir);
            }
        }

        let seeds = [
            (self.names_path(), "[]"),
            (self.env_path(), ENV_TEMPLATE),
            (self.config_path(), "{}"),
            (self.readme_path(), README_TEMPLATE),
        ];
        for (path, contents) in seeds {
            if !path.exists() {
                fs::write(&path, contents).map_err(|source| WorkspaceError::Create {
                    path: path.clone(),
                    source,
                })?;
                report.created.push(path);
            }
        }

        if !report.created.is_empty() {
            debug!(created = report.created.len(), root = %self.root.display(), "workspace initialised");
        }
        Ok(report)
    }

    /// Read the roster persisted in `data/names.json`.
    pub fn load_names(&self) -> Result<Vec<String>, WorkspaceError> {
        let path = self.names_path();
        let raw = fs::read_to_string(&path).map_err(|source| WorkspaceError::Read {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| WorkspaceError::Names { path, source })
    }

    /// Overwrite `data/names.json` with the given roster.
    pub fn save_names(&self, names: &[String]) -> Result<(), WorkspaceError> {
        let path = self.names_path();
        let body = serde_json::to_string_pretty(names).map_err(|source| WorkspaceError::Names {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, body).map_err(|source| WorkspaceError::Write { path, source })
    }

    /// Job requirements, if `REQUIREMENTS.md` exists and is readable.
    pub fn load_requirements(&self) -> Option<String> {
        fs::read_to_string(self.requirements_path()).ok()
    }
}

/// Paths created by [`Workspace::ensure_setup`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupReport {
    pub created: Vec<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("unable to create {}: {source}", path.display())]
    Create { path: PathBuf, source: io::Error },
    #[error("unable to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("unable to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("{} is not a JSON array of names: {source}", path.display())]
    Names {
        path: PathBuf,
        source: serde_json::Error,
    },
}
