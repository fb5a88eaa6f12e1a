//! CLI argument definitions using clap
//!
//! Command-line values take precedence over the configuration file, which
//! takes precedence over built-in defaults.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::DocmagenConfig;
use crate::error::{DocmagenError, Result};
use crate::lang::Lang;
use crate::pipeline::RunOptions;

/// Output directory used when neither the command line nor the config names one
pub const DEFAULT_OUT_DIR: &str = "docmagen";

/// Add JSDoc type tags to TypeScript sources ahead of documentation generation
#[derive(Parser, Debug)]
#[command(name = "docmagen")]
#[command(about = "Synthesizes JSDoc type tags from TypeScript declarations")]
#[command(version)]
pub struct Cli {
    /// Source directory to annotate
    #[arg(short, long)]
    pub src: Option<PathBuf>,

    /// Directory the annotated files are staged into
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Configuration file (defaults to ./docmagen.toml when present)
    #[arg(short, long, env = "DOCMAGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory to leave out (repeatable)
    #[arg(long, value_name = "DIR")]
    pub ignore: Vec<PathBuf>,

    /// File extensions to process (comma-separated, e.g. ts,tsx)
    #[arg(long = "ext", value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Only report files that would change; write nothing
    #[arg(long)]
    pub check: bool,

    /// Fail when any declaration had to be skipped
    #[arg(long)]
    pub strict: bool,

    /// Output format for the run summary
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: OutputFormat,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Never print the output directory as a terminal hyperlink
    #[arg(long = "no-hyperlink", alias = "no-hyperlinks", hide = true)]
    pub no_hyperlink: bool,

    /// Hyperlink mode (always/true or never/false)
    #[arg(long, hide = true, value_name = "WHEN")]
    pub hyperlink: Option<String>,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    #[value(alias = "pretty")]
    Text,
    /// JSON - standard JSON output for machine parsing
    Json,
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Log level to use, `-v` overriding the configured one
    pub fn log_level<'a>(&self, config: &'a DocmagenConfig) -> &'a str {
        if self.verbose {
            "debug"
        } else {
            &config.logging.level
        }
    }

    /// Merge command-line values over `config` into run options
    pub fn run_options(&self, config: &DocmagenConfig) -> Result<RunOptions> {
        let src = self
            .src
            .clone()
            .or_else(|| config.annotate.src.clone())
            .ok_or_else(|| DocmagenError::ConfigError {
                message: "no source directory given (use --src or set annotate.src)"
                    .to_string(),
            })?;

        let out = self
            .out
            .clone()
            .or_else(|| config.annotate.out.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));

        let ignore = if self.ignore.is_empty() {
            config.annotate.ignore.clone()
        } else {
            self.ignore.clone()
        };

        let extensions: Vec<String> = if self.extensions.is_empty() {
            config.annotate.extensions.clone()
        } else {
            self.extensions.clone()
        };
        let extensions = extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect::<Vec<_>>();
        if extensions.is_empty() {
            return Err(DocmagenError::ConfigError {
                message: "no file extensions to process".to_string(),
            });
        }
        for ext in &extensions {
            Lang::from_extension(ext)?;
        }

        Ok(RunOptions {
            src,
            out,
            ignore,
            extensions,
            check: self.check,
        })
    }
}
