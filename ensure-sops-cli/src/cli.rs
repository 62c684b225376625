use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use colored::Colorize;
use ensure_sops::{FsSourceConfig, Strategy, ValidationConfig, ValidationReport, output};

use crate::logging;

/// Format selection strategy, as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Method {
    /// Try the format matching the extension, or JSON then YAML.
    Strict,
    /// Try every format, starting with the one matching the extension.
    Bruteforce,
}

impl From<Method> for Strategy {
    fn from(method: Method) -> Self {
        match method {
            Method::Strict => Strategy::Strict,
            Method::Bruteforce => Strategy::Bruteforce,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per failed file on stderr.
    Human,
    /// The full report as JSON on stdout.
    Json,
}

/// Fail when configuration files are not fully encrypted with SOPS.
#[derive(Debug, Parser)]
#[command(name = "ensure-sops", version, about)]
pub struct Cli {
    /// Files to check.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// How to pick the formats tried for each file.
    #[arg(long, value_enum, default_value_t = Method::Strict)]
    pub method: Method,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). Also adds a
    /// summary line to failed human-readable reports.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,
}

/// Parse arguments, validate every file, and report.
///
/// # Errors
///
/// Returns an error if validation cannot start or the report cannot be written.
pub fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if cli.no_color || !io::stderr().is_terminal() {
        colored::control::set_override(false);
    }

    let mut fs_config = FsSourceConfig::default();
    fs_config.paths.clone_from(&cli.files);
    let mut validation_config = ValidationConfig::default();
    validation_config.strategy = cli.method.into();

    let report = ensure_sops::validate_files(&fs_config, &validation_config)?;

    match cli.format {
        OutputFormat::Human => {
            let mut stderr = io::stderr().lock();
            output::write_human(&report, &mut stderr)?;
            if cli.verbose > 0 {
                write_summary(&report, &mut stderr)?;
            }
        }
        OutputFormat::Json => {
            output::write_json(&report, &mut io::stdout().lock())?;
        }
    }

    Ok(if report.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Closing line for failed runs, printed with `-v`. Successful runs stay silent.
fn write_summary(report: &ValidationReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    if report.ok {
        return Ok(());
    }
    let summary = format!(
        "{} of {} file(s) failed the SOPS encryption check",
        report.failed_files(),
        report.files_attempted()
    );
    writeln!(writer, "{}", summary.red().bold())?;
    Ok(())
}
