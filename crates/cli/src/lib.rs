//! CLI for GPU Bench.
//!
//! This crate provides the `gpubench` command-line interface: extracting
//! benchmark logs, normalizing reference spreadsheets, and sanity checking a
//! device against the reference corpus.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod config;
pub mod device;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use config::SanityConfig;
use gpubench_benchmarks::{io, markdown, BenchmarkReport, LogExtractor};
use gpubench_sanity::{reporter, SanityComparator, Tolerance};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// GPU Bench CLI.
#[derive(Parser, Debug)]
#[command(name = "gpubench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (TOML).
    #[arg(short, long, global = true, env = "GPUBENCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Verdict output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per failure plus a summary line.
    Text,
    /// Markdown report.
    Markdown,
    /// Structured JSON verdict.
    Json,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract a benchmark console log into a subject report.
    Extract {
        /// Benchmark log file.
        log: PathBuf,

        /// Device model the timings belong to (detected when omitted).
        #[arg(short, long, env = "GPUBENCH_DEVICE")]
        device: Option<String>,

        /// Output file (default: gpu_benchmark_results.json).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Normalize a two-header-row CSV spreadsheet into a reference record.
    Normalize {
        /// CSV export of the reference spreadsheet.
        table: PathBuf,

        /// Output file (default: ai_benchmark_results.json).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a device's results against the reference corpus.
    Sanity {
        /// Subject report produced by `extract`.
        #[arg(short, long, conflicts_with = "log")]
        subject: Option<PathBuf>,

        /// Benchmark log to extract and check directly.
        #[arg(short, long)]
        log: Option<PathBuf>,

        /// Reference corpus file.
        #[arg(short, long, env = "GPUBENCH_REFERENCE")]
        reference: Option<PathBuf>,

        /// Device model to check (from the subject report or detected when omitted).
        #[arg(short, long, env = "GPUBENCH_DEVICE")]
        device: Option<String>,

        /// Absolute tolerance in milliseconds.
        #[arg(short, long, env = "GPUBENCH_TOLERANCE")]
        tolerance: Option<f64>,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the detected device model.
    Device {
        /// Read `nvidia-smi -L` output from a file instead of running it.
        #[arg(long)]
        from: Option<PathBuf>,
    },

    /// Render a subject report as markdown.
    Report {
        /// Subject report file.
        subject: PathBuf,
    },
}

/// Install the global tracing subscriber. Logs go to stderr.
pub fn init_tracing(verbose: bool, json: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

/// Parse arguments, set up logging and run the CLI.
///
/// # Returns
///
/// The process exit status: 0 on success or a passing sanity check, 1 when
/// the sanity check found failures.
pub fn run() -> anyhow::Result<u8> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);
    let stdout = std::io::stdout();
    run_with(cli, &mut stdout.lock())
}

/// Run a parsed command, writing results to `out`.
pub fn run_with(cli: Cli, out: &mut impl Write) -> anyhow::Result<u8> {
    let config = SanityConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Extract {
            log,
            device,
            output,
        } => {
            let device = resolve_device(device, None)?;
            let report = extract(&log, &device, &config)?;
            let output = output.unwrap_or_else(|| PathBuf::from(io::SUBJECT_FILE));
            io::write_report(&report, &output)?;
            writeln!(
                out,
                "Extracted {} model(s) for {} into {}",
                report.measured_families(),
                device,
                output.display()
            )?;
            Ok(reporter::EXIT_PASSED)
        }
        Commands::Normalize { table, output } => {
            let record = gpubench_benchmarks::normalize_csv(&table)
                .with_context(|| format!("Failed to normalize {}", table.display()))?;
            let output = output.unwrap_or_else(|| PathBuf::from(io::REFERENCE_FILE));
            io::write_record(&record, &output)?;
            writeln!(
                out,
                "Normalized {} benchmark famil{} into {}",
                record.len(),
                if record.len() == 1 { "y" } else { "ies" },
                output.display()
            )?;
            Ok(reporter::EXIT_PASSED)
        }
        Commands::Sanity {
            subject,
            log,
            reference,
            device,
            tolerance,
            format,
        } => {
            let tolerance = match tolerance {
                Some(ms) => Tolerance::new(ms)?,
                None => config.tolerance_ms,
            };
            let (report, device) = match log {
                Some(log) => {
                    let device = resolve_device(device, None)?;
                    (extract(&log, &device, &config)?, device)
                }
                None => {
                    let path = subject.unwrap_or_else(|| PathBuf::from(io::SUBJECT_FILE));
                    let report = io::read_report(&path)?;
                    let device = resolve_device(device, report.device.as_deref())?;
                    (report, device)
                }
            };

            let reference_path = reference.unwrap_or_else(|| config.reference.clone());
            let reference = io::read_record(&reference_path)?;
            info!(
                families = reference.len(),
                path = %reference_path.display(),
                "Loaded reference corpus"
            );

            let verdict = SanityComparator::new(tolerance).check(
                &report.deep_learning,
                &reference,
                &device,
            );
            for family in verdict.skipped() {
                info!(family = %family, "Family not covered by reference, skipped");
            }
            if !verdict.passed() {
                warn!(failures = verdict.failure_count(), device = %device, "Sanity check failed");
            }

            match format {
                OutputFormat::Text => write!(out, "{}", reporter::TextReport(&verdict))?,
                OutputFormat::Markdown => {
                    write!(out, "{}", reporter::render_markdown(&verdict, &device))?
                }
                OutputFormat::Json => {
                    serde_json::to_writer_pretty(&mut *out, &verdict)?;
                    writeln!(out)?;
                }
            }
            Ok(reporter::exit_code(&verdict))
        }
        Commands::Device { from } => {
            let device = match from {
                Some(path) => {
                    let text = io::read_log(&path)?;
                    match device::parse_device_name(&text) {
                        Some(device) => device,
                        None => bail!("No supported GPU model found in {}", path.display()),
                    }
                }
                None => device::detect_device()?,
            };
            writeln!(out, "{device}")?;
            Ok(reporter::EXIT_PASSED)
        }
        Commands::Report { subject } => {
            let report = io::read_report(&subject)?;
            write!(out, "{}", markdown::generate_summary(&report))?;
            Ok(reporter::EXIT_PASSED)
        }
    }
}

fn extract(log: &Path, device: &str, config: &SanityConfig) -> anyhow::Result<BenchmarkReport> {
    let text = io::read_log(log)?;
    let extractor = LogExtractor::new(config.recognized_models.clone());
    let report = extractor.extract(&text, device);
    info!(
        models = report.measured_families(),
        path = %log.display(),
        "Extracted benchmark log"
    );
    Ok(report)
}

/// Explicit device, then the one recorded in the subject, then detection.
fn resolve_device(explicit: Option<String>, recorded: Option<&str>) -> anyhow::Result<String> {
    if let Some(device) = explicit.filter(|d| !d.trim().is_empty()) {
        let device = device.trim().to_string();
        if let Some(recorded) = overridden_device(&device, recorded) {
            warn!(
                device = %device,
                recorded,
                "Subject timings are keyed by the recorded device; overriding it will report them as missing"
            );
        }
        return Ok(device);
    }
    if let Some(device) = recorded {
        return Ok(device.to_string());
    }
    device::detect_device().context("Could not determine the device model; pass --device")
}

/// The recorded device, when it differs from the one asked for.
fn overridden_device<'a>(device: &str, recorded: Option<&'a str>) -> Option<&'a str> {
    recorded.filter(|recorded| recorded.trim() != device)
}
