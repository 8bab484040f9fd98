//! Application configuration: optional YAML file, then environment overrides.
//!
//! Every field has a default, so an empty or absent file yields the stock dashboard
//! reading `data/*.csv` and serving on 127.0.0.1:3000.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::data::{DataSources, MatchPolicy};
use crate::projector::{ProjectorConfig, ProjectorConfigError, Selection};

pub const DEFAULT_CONFIG_PATH: &str = "travelbuddy.yaml";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

pub const ENV_CONFIG: &str = "TRAVELBUDDY_CONFIG";
pub const ENV_BIND: &str = "TRAVELBUDDY_BIND";
pub const ENV_DATA_DIR: &str = "TRAVELBUDDY_DATA_DIR";
pub const ENV_MATCH_POLICY: &str = "TRAVELBUDDY_MATCH_POLICY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config '{}': {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid {var}: {message}")]
    Env { var: &'static str, message: String },
    #[error(transparent)]
    Projector(#[from] ProjectorConfigError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind: String,
    pub sources: DataSources,
    pub match_policy: MatchPolicy,
    pub projector: ProjectorConfig,
    /// Selection shown before the user types anything.
    pub initial_selection: Selection,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            bind: DEFAULT_BIND.to_string(),
            sources: DataSources::default(),
            match_policy: MatchPolicy::default(),
            projector: ProjectorConfig::default(),
            initial_selection: Selection::default(),
        }
    }
}

impl AppConfig {
    pub fn from_yaml_str(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(AppConfig::default());
        }
        serde_yaml::from_str(raw).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path` when given (it must exist), else the default file when present,
    /// else defaults. Environment overrides are applied last, then the result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(ENV_CONFIG).map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => Self::read_file(&path)?,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_PATH);
                if fallback.is_file() {
                    Self::read_file(fallback)?
                } else {
                    debug!("no config file, using defaults");
                    AppConfig::default()
                }
            }
        };
        config.apply_env(|var| env::var(var).ok())?;
        config.projector.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "config file read");
        Self::from_yaml_str(&raw, path)
    }

    /// Applies `TRAVELBUDDY_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup(ENV_BIND).filter(|v| !v.trim().is_empty()) {
            self.bind = bind;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            self.sources = DataSources::in_dir(dir);
        }
        if let Some(policy) = lookup(ENV_MATCH_POLICY) {
            self.match_policy = policy.parse().map_err(|message| ConfigError::Env {
                var: ENV_MATCH_POLICY,
                message,
            })?;
        }
        Ok(())
    }
}
