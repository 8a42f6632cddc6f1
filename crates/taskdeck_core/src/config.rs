//! Runtime configuration for the task store and remote viewer.
//!
//! # Responsibility
//! - Resolve database path, log settings and posts URL.
//! - Layer defaults, an optional TOML file and environment overrides.
//!
//! # Invariants
//! - Precedence is defaults < file < environment.
//! - Blank override values are ignored.
//! - `posts_url` is always an absolute http(s) URL after `load`.

use crate::logging::default_log_level;
use crate::remote::DEFAULT_POSTS_URL;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use url::Url;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "taskdeck.toml";
const DEFAULT_DB_FILE_NAME: &str = "taskdeck.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "taskdeck-logs";

pub const ENV_DB_PATH: &str = "TASKDECK_DB_PATH";
pub const ENV_LOG_DIR: &str = "TASKDECK_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "TASKDECK_LOG_LEVEL";
pub const ENV_POSTS_URL: &str = "TASKDECK_POSTS_URL";

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, message: String },
    InvalidUrl { value: String, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "invalid config `{}`: {message}", path.display())
            }
            Self::InvalidUrl { value, message } => {
                write!(f, "invalid posts_url `{value}`: {message}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { .. } | Self::InvalidUrl { .. } => None,
        }
    }
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub posts_url: Url,
}

/// Optional keys accepted in `taskdeck.toml`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    db_path: Option<PathBuf>,
    log_dir: Option<PathBuf>,
    log_level: Option<String>,
    posts_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let temp = std::env::temp_dir();
        Self {
            db_path: temp.join(DEFAULT_DB_FILE_NAME),
            log_dir: temp.join(DEFAULT_LOG_DIR_NAME),
            log_level: default_log_level().to_string(),
            posts_url: default_posts_url(),
        }
    }
}

impl AppConfig {
    /// Resolves configuration from process environment.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::load`] with an injectable environment lookup.
    pub fn load_with_env(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let file = match path {
            Some(path) => Some(read_file_config(path)?),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Some(read_file_config(fallback)?)
                } else {
                    None
                }
            }
        };
        if let Some(file) = file {
            config.apply_file(file)?;
        }

        if let Some(value) = non_blank(env(ENV_DB_PATH)) {
            config.db_path = PathBuf::from(value);
        }
        if let Some(value) = non_blank(env(ENV_LOG_DIR)) {
            config.log_dir = PathBuf::from(value);
        }
        if let Some(value) = non_blank(env(ENV_LOG_LEVEL)) {
            config.log_level = value;
        }
        if let Some(value) = non_blank(env(ENV_POSTS_URL)) {
            config.posts_url = parse_posts_url(&value)?;
        }

        Ok(config)
    }

    /// Parses TOML text directly; used for embedded or generated configs.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let file = parse_file_config(Path::new("<inline>"), raw)?;
        let mut config = Self::default();
        config.apply_file(file)?;
        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) -> Result<(), ConfigError> {
        if let Some(db_path) = file.db_path {
            self.db_path = db_path;
        }
        if let Some(log_dir) = file.log_dir {
            self.log_dir = log_dir;
        }
        if let Some(level) = non_blank(file.log_level) {
            self.log_level = level;
        }
        if let Some(url) = non_blank(file.posts_url) {
            self.posts_url = parse_posts_url(&url)?;
        }
        Ok(())
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_file_config(path, &raw)
}

fn parse_file_config(path: &Path, raw: &str) -> Result<FileConfig, ConfigError> {
    toml::from_str(raw).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

fn parse_posts_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|err| ConfigError::InvalidUrl {
        value: value.to_string(),
        message: err.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl {
            value: value.to_string(),
            message: format!("unsupported scheme `{other}`"),
        }),
    }
}

fn default_posts_url() -> Url {
    Url::parse(DEFAULT_POSTS_URL).expect("valid default posts url")
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}
