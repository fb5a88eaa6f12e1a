//! docmagen CLI entry point

use std::fmt::Write as _;
use std::path::Path;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use docmagen::pipeline::{self, Identity, RunReport};
use docmagen::terminal_link::terminal_link;
use docmagen::{Cli, DocmagenConfig, DocmagenError, OutputFormat};

fn main() -> ExitCode {
    match run() {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

fn run() -> docmagen::Result<String> {
    let cli = Cli::parse_args();
    let config = DocmagenConfig::load(cli.config.as_deref())?;
    init_logging(cli.log_level(&config));

    let options = cli.run_options(&config)?;
    let report = pipeline::run(&options, &Identity)?;

    let output = match cli.format {
        OutputFormat::Text => format_text(&report, options.check),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&report).map_err(|e| {
                DocmagenError::SerializationFailure {
                    message: e.to_string(),
                }
            })?;
            json.push('\n');
            json
        }
    };

    // The summary is still wanted when the run ends in a failing status
    if options.check && report.changed_files() > 0 {
        print!("{}", output);
        return Err(DocmagenError::PendingChanges {
            count: report.changed_files(),
        });
    }
    if cli.strict && report.skipped_declarations() > 0 {
        print!("{}", output);
        return Err(DocmagenError::SkippedDeclarations {
            count: report.skipped_declarations(),
        });
    }

    Ok(output)
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn format_text(report: &RunReport, check: bool) -> String {
    let mut out = String::new();

    for file in &report.files {
        if let Some(error) = &file.error {
            let _ = writeln!(out, "  failed   {}: {}", file.path, error);
        } else if file.changed_blocks > 0 {
            let verb = if check { "pending" } else { "changed" };
            let _ = writeln!(
                out,
                "  {}  {} ({} block(s))",
                verb, file.path, file.changed_blocks
            );
        }
        for skip in &file.skipped {
            let _ = writeln!(
                out,
                "  skipped  {}:{} {} ({:?})",
                file.path,
                skip.line,
                skip.name.as_deref().unwrap_or("<anonymous>"),
                skip.reason
            );
        }
    }

    let _ = writeln!(
        out,
        "{} file(s), {} changed, {} skipped declaration(s), {} failed",
        report.files.len(),
        report.changed_files(),
        report.skipped_declarations(),
        report.failed_files()
    );

    if let Some(dir) = &report.out {
        let _ = writeln!(out, "Output: {}", terminal_link(&dir.display().to_string(), &file_url(dir)));
    }
    out
}

fn file_url(dir: &Path) -> String {
    let absolute = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    format!("file://{}", absolute.display())
}
