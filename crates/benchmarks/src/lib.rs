//! Benchmark ingestion for GPU Bench.
//!
//! This crate turns raw benchmark output into canonical records: spreadsheet
//! exports of the reference corpus and console logs from a fresh run.
//!
//! # Quick Start
//!
//! ```no_run
//! use gpubench_benchmarks::{io, LogExtractor, RecognizedModels};
//!
//! let text = io::read_log("results.txt")?;
//! let report = LogExtractor::new(RecognizedModels::default()).extract(&text, "GeForce RTX 4090");
//! io::write_report(&report, io::SUBJECT_FILE)?;
//! # Ok::<(), gpubench_benchmarks::io::IoError>(())
//! ```
//!
//! # Modules
//!
//! - [`log`] - Console log extraction
//! - [`tabular`] - Two-header-row spreadsheet normalization
//! - [`models`] - The recognized deep-learning model set
//! - [`report`] - The subject [`BenchmarkReport`]
//! - [`io`] - Reading and writing records, reports and logs
//! - [`markdown`] - Markdown report generation

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod io;
pub mod log;
pub mod markdown;
pub mod models;
pub mod report;
pub mod tabular;

pub use log::{parse_log, LogExtractor};
pub use models::{RecognizedModels, DEFAULT_RECOGNIZED_MODELS};
pub use report::BenchmarkReport;
pub use tabular::{normalize, Table};

use gpubench_core::CanonicalRecord;
use std::path::Path;

/// Load a CSV spreadsheet export and normalize it into a reference record.
///
/// # Errors
///
/// Returns an [`io::IoError`] if the file cannot be read, is not valid CSV,
/// or cannot be normalized.
pub fn normalize_csv(path: impl AsRef<Path>) -> io::Result<CanonicalRecord> {
    let table = Table::from_csv_path(path)?;
    Ok(normalize(&table)?)
}
