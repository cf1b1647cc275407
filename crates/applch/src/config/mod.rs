use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use serde::Deserialize;

use crate::workspace::{Workspace, API_KEY_PLACEHOLDER};

pub const DEFAULT_MODEL: &str = "sonar-reasoning-pro";
pub const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai";
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Top-level configuration, loaded once before any command runs.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub models: ModelConfig,
    pub api: ApiConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Merge built-in defaults with `config.json` and the environment
    /// (including the workspace `.env`).
    pub fn load(workspace: &Workspace) -> Result<Self, ConfigError> {
        dotenvy::from_path(workspace.env_path()).ok();

        let overrides = ConfigOverrides::read(workspace)?;
        let models = ModelConfig::default().merged(overrides);

        let api_key = env::var("PERPLEXITY_API_KEY")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty() && value != API_KEY_PLACEHOLDER);
        let base_url =
            env::var("PERPLEXITY_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            models,
            api: ApiConfig { api_key, base_url },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Model selection for the two AI passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    pub check_model: String,
    pub check_pro_search: bool,
    pub arena_model: String,
    pub arena_pro_search: bool,
    /// Upper bound on in-flight check requests; `None` dispatches all at once.
    pub check_concurrency: Option<NonZeroUsize>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            check_model: DEFAULT_MODEL.to_string(),
            check_pro_search: false,
            arena_model: DEFAULT_MODEL.to_string(),
            arena_pro_search: false,
            check_concurrency: None,
        }
    }
}

impl ModelConfig {
    fn merged(self, overrides: ConfigOverrides) -> Self {
        Self {
            check_model: overrides.check_model.unwrap_or(self.check_model),
            check_pro_search: overrides.check_pro_search.unwrap_or(self.check_pro_search),
            arena_model: overrides.arena_model.unwrap_or(self.arena_model),
            arena_pro_search: overrides.arena_pro_search.unwrap_or(self.arena_pro_search),
            check_concurrency: overrides.check_concurrency.or(self.check_concurrency),
        }
    }
}

/// Partial view of `config.json`; absent keys keep their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigOverrides {
    check_model: Option<String>,
    check_pro_search: Option<bool>,
    arena_model: Option<String>,
    arena_pro_search: Option<bool>,
    check_concurrency: Option<NonZeroUsize>,
}

impl ConfigOverrides {
    fn read(workspace: &Workspace) -> Result<Self, ConfigError> {
        let path = workspace.config_path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => return Err(ConfigError::Unreadable { path, source }),
        };
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(&raw).map_err(|source| ConfigError::Malformed { path, source })
    }
}

/// Credential and endpoint for the chat-completion service.
#[derive(Clone)]
pub struct ApiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    Unreadable { path: PathBuf, source: io::Error },
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Unreadable { path, .. } => {
                write!(f, "unable to read {}", path.display())
            }
            ConfigError::Malformed { path, source } => {
                write!(f, "{} is not valid configuration: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Unreadable { source, .. } => Some(source),
            ConfigError::Malformed { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};
    use tempfile::TempDir;

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("PERPLEXITY_API_KEY");
        env::remove_var("PERPLEXITY_BASE_URL");
        env::remove_var("APP_LOG_LEVEL");
    }

    #[test]
    fn load_uses_defaults_when_files_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let dir = TempDir::new().expect("tempdir");

        let config = AppConfig::load(&Workspace::new(dir.path())).expect("config loads");

        assert_eq!(config.models, ModelConfig::default());
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert!(config.api.api_key.is_none());
        assert_eq!(config.telemetry.log_level, "warn");
    }

    #[test]
    fn partial_overrides_keep_remaining_defaults() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let dir = TempDir::new().expect("tempdir");
        let workspace = Workspace::new(dir.path());
        fs::write(
            workspace.config_path(),
            r#"{"arenaModel": "sonar-pro", "arenaProSearch": true, "unknown": 1}"#,
        )
        .expect("write config");

        let config = AppConfig::load(&workspace).expect("config loads");

        assert_eq!(config.models.check_model, DEFAULT_MODEL);
        assert!(!config.models.check_pro_search);
        assert_eq!(config.models.arena_model, "sonar-pro");
        assert!(config.models.arena_pro_search);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let dir = TempDir::new().expect("tempdir");
        let workspace = Workspace::new(dir.path());
        fs::write(workspace.config_path(), "{ nope").expect("write config");

        let err = AppConfig::load(&workspace).expect_err("malformed json rejected");
        assert!(matches!(err, ConfigError::Malformed { .. }));
    }

    #[test]
    fn placeholder_key_counts_as_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let dir = TempDir::new().expect("tempdir");
        let workspace = Workspace::new(dir.path());
        fs::write(
            workspace.env_path(),
            format!("PERPLEXITY_API_KEY={API_KEY_PLACEHOLDER}\n"),
        )
        .expect("write env");

        let config = AppConfig::load(&workspace).expect("config loads");
        assert!(config.api.api_key.is_none());
        reset_env();
    }
}
