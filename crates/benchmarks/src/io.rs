//! I/O operations for canonical records and benchmark reports.
//!
//! This module reads and writes the JSON files exchanged between runs: the
//! reference corpus (a bare [`CanonicalRecord`]) and subject reports
//! ([`BenchmarkReport`]).

use crate::report::BenchmarkReport;
use gpubench_core::{CanonicalRecord, SchemaError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default reference corpus file name.
pub const REFERENCE_FILE: &str = "ai_benchmark_results.json";

/// Default subject report file name.
pub const SUBJECT_FILE: &str = "gpu_benchmark_results.json";

/// Errors raised while loading or storing benchmark data.
#[derive(Debug, Error)]
pub enum IoError {
    /// File could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        /// Offending path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// File could not be written.
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        /// Offending path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// File content is not valid JSON for the expected type.
    #[error("Invalid JSON in {}: {source}", .path.display())]
    Json {
        /// Offending path.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// Tabular input is not valid CSV.
    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Tabular input cannot be normalized.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, IoError>;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| IoError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|source| IoError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| IoError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a canonical record (reference corpus) from a JSON file.
pub fn read_record(path: impl AsRef<Path>) -> Result<CanonicalRecord> {
    read_json(path.as_ref())
}

/// Write a canonical record to a JSON file.
pub fn write_record(record: &CanonicalRecord, path: impl AsRef<Path>) -> Result<()> {
    write_json(record, path.as_ref())
}

/// Read a subject report from a JSON file.
pub fn read_report(path: impl AsRef<Path>) -> Result<BenchmarkReport> {
    read_json(path.as_ref())
}

/// Write a subject report to a JSON file.
pub fn write_report(report: &BenchmarkReport, path: impl AsRef<Path>) -> Result<()> {
    write_json(report, path.as_ref())
}

/// Read a benchmark log as text.
pub fn read_log(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })
}
