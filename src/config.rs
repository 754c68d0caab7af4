use crate::calendar::WeekStart;
use crate::event::TaskType;
use crate::format::TimeFormat;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

const APP_DIR: &str = "evcal";

const CONFIG_FILE: &str = "config.toml";

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub(crate) struct Config {
    pub(crate) week_start: WeekStart,
    pub(crate) time_format: TimeFormat,
    /// The choices offered for an event's task type; the first is the
    /// default for new events
    pub(crate) task_types: Vec<TaskType>,
    pub(crate) log: LogConfig,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            week_start: WeekStart::default(),
            time_format: TimeFormat::default(),
            task_types: vec![
                TaskType::new("Write an email to a colleague"),
                TaskType::new("Update the database"),
            ],
            log: LogConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub(crate) struct LogConfig {
    pub(crate) enabled: bool,
    /// A `flexi_logger` log specification, e.g. `"info"` or
    /// `"warn, evcal::store=debug"`
    pub(crate) level: String,
    pub(crate) directory: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> LogConfig {
        LogConfig {
            enabled: true,
            level: String::from("info"),
            directory: None,
        }
    }
}

impl LogConfig {
    /// The configured log directory, or else the per-user cache directory
    pub(crate) fn resolved_directory(&self) -> Option<PathBuf> {
        self.directory
            .clone()
            .or_else(|| dirs::cache_dir().map(|p| p.join(APP_DIR)))
    }
}

impl Config {
    /// Load the configuration from `path` if given, else from the default
    /// location if a file exists there, else use the defaults
    pub(crate) fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        match path {
            Some(p) => Config::from_file(p),
            None => match default_path() {
                Some(p) if p.exists() => Config::from_file(&p),
                _ => Ok(Config::default()),
            },
        }
    }

    pub(crate) fn from_file(path: &Path) -> Result<Config, ConfigError> {
        let src = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        src.parse::<Config>().map_err(|source| ConfigError::Invalid {
            path: path.to_owned(),
            source,
        })
    }

    fn validate(self) -> Result<Config, ParseConfigError> {
        if self.task_types.is_empty() {
            return Err(ParseConfigError::NoTaskTypes);
        }
        if self.task_types.iter().any(|tt| tt.as_str().trim().is_empty()) {
            return Err(ParseConfigError::BlankTaskType);
        }
        Ok(self)
    }
}

impl FromStr for Config {
    type Err = ParseConfigError;

    fn from_str(s: &str) -> Result<Config, ParseConfigError> {
        toml::from_str::<Config>(s)?.validate()
    }
}

/// `$XDG_CONFIG_HOME/evcal/config.toml` or the platform equivalent
pub(crate) fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR).join(CONFIG_FILE))
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read configuration file {}", path.display())]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("invalid configuration file {}", path.display())]
    Invalid {
        path: PathBuf,
        source: ParseConfigError,
    },
}

#[derive(Debug, Error)]
pub(crate) enum ParseConfigError {
    #[error(transparent)]
    Syntax(#[from] toml::de::Error),
    #[error("task-types must not be empty")]
    NoTaskTypes,
    #[error("task-types must not contain blank entries")]
    BlankTaskType,
}
