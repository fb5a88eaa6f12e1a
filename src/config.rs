//! docmagen configuration file.
//!
//! Read from `docmagen.toml` in the working directory when present, or from
//! the path given with `--config`. Every value can be overridden on the
//! command line.

use crate::error::DocmagenError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "docmagen.toml";

/// docmagen configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DocmagenConfig {
    /// Annotation settings
    #[serde(default)]
    pub annotate: AnnotateConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Annotation configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnnotateConfig {
    /// Source directory to read from
    #[serde(default)]
    pub src: Option<PathBuf>,

    /// Directory annotated files are staged into
    #[serde(default)]
    pub out: Option<PathBuf>,

    /// File extensions to process
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directories to leave out
    #[serde(default)]
    pub ignore: Vec<PathBuf>,
}

fn default_extensions() -> Vec<String> {
    vec!["ts".to_string(), "tsx".to_string()]
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self {
            src: None,
            out: None,
            extensions: default_extensions(),
            ignore: Vec::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl DocmagenConfig {
    /// Load configuration from an explicit path, or from
    /// [`DEFAULT_CONFIG_FILE`] in the working directory if it exists.
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file yields the default configuration.
    pub fn load(explicit: Option<&Path>) -> Result<Self, DocmagenError> {
        match explicit {
            Some(path) if !path.exists() => Err(DocmagenError::FileNotFound {
                path: path.display().to_string(),
            }),
            Some(path) => Self::load_from(path),
            None => Self::load_from(Path::new(DEFAULT_CONFIG_FILE)),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, DocmagenError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| DocmagenError::io_at(path, e))?;
        Self::parse(&content)
    }

    /// Parse configuration text
    pub fn parse(content: &str) -> Result<Self, DocmagenError> {
        toml::from_str(content).map_err(|e| DocmagenError::ConfigError {
            message: format!("Failed to parse config: {}", e),
        })
    }
}
