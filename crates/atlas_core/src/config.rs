//! Ingestion configuration.
//!
//! # Responsibility
//! - Load optional JSON configuration and fill unspecified keys with defaults.
//! - Validate values before any ingestion starts.
//!
//! # Invariants
//! - `codeowners_paths` is non-empty and tried in declaration order.
//!
//! ## Example
//!
//! ```json
//! {
//!   "readme_path": "README.md",
//!   "codeowners_paths": [".github/CODEOWNERS", "CODEOWNERS"],
//!   "log_level": "info",
//!   "max_repos": 200
//! }
//! ```

use crate::logging::{default_log_level, normalize_level};
use crate::ownership::DEFAULT_README_PATH;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// CODEOWNERS locations tried per repository, first hit wins.
pub const DEFAULT_CODEOWNERS_PATHS: &[&str] =
    &[".github/CODEOWNERS", "CODEOWNERS", "docs/CODEOWNERS"];

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid(_) => None,
        }
    }
}

/// Effective configuration after defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasConfig {
    /// Source file for this config, if any.
    pub source: Option<PathBuf>,
    /// README path label reported in source locations.
    pub readme_path: String,
    /// CODEOWNERS lookup order.
    pub codeowners_paths: Vec<String>,
    pub log_level: String,
    /// Optional cap on repositories ingested per run.
    pub max_repos: Option<usize>,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            source: None,
            readme_path: DEFAULT_README_PATH.to_string(),
            codeowners_paths: DEFAULT_CODEOWNERS_PATHS
                .iter()
                .map(|path| path.to_string())
                .collect(),
            log_level: default_log_level().to_string(),
            max_repos: None,
        }
    }
}

/// Raw config as deserialized from JSON.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    readme_path: Option<String>,
    codeowners_paths: Option<Vec<String>>,
    log_level: Option<String>,
    max_repos: Option<usize>,
}

impl AtlasConfig {
    /// Loads config from `path`, or returns defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        Ok(Self {
            source: Some(path.to_path_buf()),
            ..config
        })
    }

    /// Parses config from JSON text and validates it.
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let raw: RawConfig = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;

        let defaults = Self::default();
        let config = Self {
            source: None,
            readme_path: raw.readme_path.unwrap_or(defaults.readme_path),
            codeowners_paths: raw.codeowners_paths.unwrap_or(defaults.codeowners_paths),
            log_level: raw.log_level.unwrap_or(defaults.log_level),
            max_repos: raw.max_repos,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.readme_path.trim().is_empty() {
            return Err(ConfigError::Invalid("readme_path must not be empty".to_string()));
        }
        if self.codeowners_paths.is_empty() {
            return Err(ConfigError::Invalid(
                "codeowners_paths must list at least one path".to_string(),
            ));
        }
        if self.codeowners_paths.iter().any(|path| path.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "codeowners_paths must not contain blank entries".to_string(),
            ));
        }
        normalize_level(&self.log_level).map_err(ConfigError::Invalid)?;
        if self.max_repos == Some(0) {
            return Err(ConfigError::Invalid("max_repos must be at least 1".to_string()));
        }
        Ok(())
    }
}
