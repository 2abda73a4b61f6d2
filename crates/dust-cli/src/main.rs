// crates/dust-cli/src/main.rs
// ============================================================================
// Module: DUST CLI Entry Point
// Description: Command dispatcher for offline account audits.
// Purpose: Evaluate snapshot bundles, list catalogues, and validate config.
// Dependencies: clap, dust-config, dust-core, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The `dust` binary runs the audit engine against a JSON bundle on disk:
//! `{ "user": {...}, "systems": { "<name>": <snapshot|null> } }`. Inputs are
//! untrusted and read with a hard size limit. The report is printed as JSON
//! on stdout; audit log events go to the configured sink.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use dust_config::DustConfig;
use dust_core::AuditReport;
use dust_core::Auditor;
use dust_core::Catalogue;
use dust_core::RunId;
use dust_core::Severity;
use dust_core::SeverityCounts;
use dust_core::SystemName;
use dust_core::UserContext;
use dust_core::catalogue;
use dust_core::catalogues;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum size of an evaluation input bundle.
const MAX_INPUT_BYTES: usize = 8 * 1024 * 1024;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "dust", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a snapshot bundle and print the report.
    Evaluate(EvaluateCommand),
    /// List test catalogues.
    Catalogue(CatalogueCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `dust evaluate`.
#[derive(Args, Debug)]
struct EvaluateCommand {
    /// Path to the JSON input bundle.
    #[arg(long, value_name = "PATH")]
    input: PathBuf,
    /// Optional config file path (defaults to dust.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Run identifier attached to the report.
    #[arg(long, value_name = "ID")]
    run_id: Option<String>,
}

/// Arguments for `dust catalogue`.
#[derive(Args, Debug)]
struct CatalogueCommand {
    /// Restrict the listing to one system.
    #[arg(long, value_name = "NAME")]
    system: Option<String>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate configuration and exit.
    Validate(ConfigValidateCommand),
}

/// Arguments for `dust config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to dust.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Input and Output
// ============================================================================

/// Evaluation input bundle.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EvaluateInput {
    /// Audited user.
    user: UserContext,
    /// Raw snapshots keyed by system name; `null` marks an absent system.
    systems: Map<String, Value>,
}

/// Evaluation output printed on stdout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateOutput {
    /// Run identifier.
    run_id: RunId,
    /// Outcomes per system.
    report: AuditReport,
    /// Severity counts per system.
    summary: Vec<SystemSummary>,
    /// Worst severity across the report.
    worst: Option<Severity>,
}

/// Severity counts of one system.
#[derive(Debug, Serialize)]
struct SystemSummary {
    /// System name.
    system: SystemName,
    /// Severity counts.
    counts: SeverityCounts,
}

/// Catalogue listing entry.
#[derive(Debug, Serialize)]
struct CatalogueEntry {
    /// Owning system.
    system: SystemName,
    /// Test identifier.
    id: &'static str,
    /// Short title.
    title: &'static str,
    /// Description.
    description: &'static str,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Evaluate(command) => command_evaluate(&command),
        Commands::Catalogue(command) => command_catalogue(&command),
        Commands::Config {
            command,
        } => match command {
            ConfigCommand::Validate(command) => command_config_validate(&command),
        },
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes the evaluation command.
fn command_evaluate(command: &EvaluateCommand) -> CliResult<ExitCode> {
    let config = DustConfig::load_or_default(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    let log = config
        .audit_log()
        .map_err(|err| CliError::new(format!("failed to open audit log: {err}")))?;
    let input = read_input(&command.input)?;
    let run_id = command.run_id.as_deref().map_or_else(default_run_id, RunId::from);

    let output = evaluate_input(&Auditor::new(config.settings()).with_log(log), input, run_id)?;
    let json = serde_json::to_string_pretty(&output)
        .map_err(|err| CliError::new(format!("failed to encode report: {err}")))?;
    write_stdout_line(&json).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the catalogue listing command.
fn command_catalogue(command: &CatalogueCommand) -> CliResult<ExitCode> {
    let entries = catalogue_entries(command.system.as_deref())?;
    let json = serde_json::to_string_pretty(&entries)
        .map_err(|err| CliError::new(format!("failed to encode catalogue: {err}")))?;
    write_stdout_line(&json).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = DustConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    write_stdout_line("config ok").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Evaluation Helpers
// ============================================================================

/// Evaluates an input bundle into a labelled report.
fn evaluate_input(
    auditor: &Auditor,
    input: EvaluateInput,
    run_id: RunId,
) -> CliResult<EvaluateOutput> {
    let raw = input.systems.into_iter().map(|(name, value)| (name, Some(value)));
    let report = auditor
        .evaluate_raw(input.user, raw)
        .map_err(|err| CliError::new(format!("invalid input: {err}")))?;

    let summary = report
        .iter()
        .map(|(system, outcomes)| SystemSummary {
            system,
            counts: SeverityCounts::from_outcomes(outcomes),
        })
        .collect();
    Ok(EvaluateOutput {
        run_id,
        worst: report.worst(),
        report,
        summary,
    })
}

/// Lists catalogue entries, optionally for one system.
fn catalogue_entries(system: Option<&str>) -> CliResult<Vec<CatalogueEntry>> {
    let chosen: Vec<&'static Catalogue> = match system {
        Some(name) => {
            let system: SystemName =
                name.parse().map_err(|err| CliError::new(format!("invalid system: {err}")))?;
            catalogue(system).into_iter().collect()
        }
        None => catalogues().collect(),
    };
    Ok(chosen
        .into_iter()
        .flat_map(|selected| {
            selected.tests.iter().map(move |spec| CatalogueEntry {
                system: selected.system,
                id: spec.id,
                title: spec.title,
                description: spec.description,
            })
        })
        .collect())
}

/// Builds a run identifier from the current time.
fn default_run_id() -> RunId {
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
    RunId::new(format!("run-{millis}"))
}

/// Reads and decodes the evaluation input bundle.
fn read_input(path: &Path) -> CliResult<EvaluateInput> {
    let bytes = read_bytes_with_limit(path, MAX_INPUT_BYTES).map_err(|err| match err {
        ReadLimitError::Io(err) => {
            CliError::new(format!("failed to read input {}: {err}", path.display()))
        }
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(format!(
            "input {} is too large ({size} bytes, limit {limit})",
            path.display()
        )),
    })?;
    serde_json::from_slice(&bytes)
        .map_err(|err| CliError::new(format!("failed to parse input {}: {err}", path.display())))
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let metadata = file.metadata().map_err(ReadLimitError::Io)?;
    let size = metadata.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut limited = file.take(limit.saturating_add(1));
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        return Err(ReadLimitError::TooLarge {
            size: actual,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
