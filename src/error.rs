//! Error types and exit codes for docmagen

use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Main error type for docmagen operations
#[derive(Error, Debug)]
pub enum DocmagenError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Unsupported language for extension: {extension}")]
    UnsupportedLanguage { extension: String },

    #[error("Failed to parse file: {message}")]
    ParseFailure { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error at {path}: {message}")]
    IoError { path: PathBuf, message: String },

    #[error("{count} file(s) would be re-annotated")]
    PendingChanges { count: usize },

    #[error("{count} declaration(s) were skipped")]
    SkippedDeclarations { count: usize },

    #[error("Failed to serialize output: {message}")]
    SerializationFailure { message: String },
}

impl DocmagenError {
    /// Convert error to a process exit code:
    /// - 0: Success
    /// - 1: File not found / IO error / output serialization
    /// - 2: Unsupported language
    /// - 3: Parse failure
    /// - 4: Configuration error
    /// - 5: `--check` found files that would change
    /// - 6: `--strict` found skipped declarations
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::FileNotFound { .. } => ExitCode::from(1),
            Self::UnsupportedLanguage { .. } => ExitCode::from(2),
            Self::ParseFailure { .. } => ExitCode::from(3),
            Self::ConfigError { .. } => ExitCode::from(4),
            Self::IoError { .. } => ExitCode::from(1),
            Self::PendingChanges { .. } => ExitCode::from(5),
            Self::SkippedDeclarations { .. } => ExitCode::from(6),
            Self::SerializationFailure { .. } => ExitCode::from(1),
        }
    }

    /// Wrap an IO error with the path it happened on
    pub fn io_at(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Result type alias for docmagen operations
pub type Result<T> = std::result::Result<T, DocmagenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let serialization = DocmagenError::SerializationFailure {
            message: "bad float".to_string(),
        };
        assert_eq!(serialization.exit_code(), ExitCode::from(1));
        assert!(!serialization.to_string().contains("Configuration"));

        let config = DocmagenError::ConfigError {
            message: "x".to_string(),
        };
        assert_eq!(config.exit_code(), ExitCode::from(4));
        assert_eq!(
            DocmagenError::PendingChanges { count: 2 }.exit_code(),
            ExitCode::from(5)
        );
        assert_eq!(
            DocmagenError::io_at("a.ts", std::io::Error::other("denied")).exit_code(),
            ExitCode::from(1)
        );
    }
}
