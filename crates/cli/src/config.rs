//! Configuration file support.
//!
//! Settings are read from an optional TOML file. Every key is optional:
//!
//! ```toml
//! tolerance_ms = 10.0
//! reference = "ai_benchmark_results.json"
//! recognized_models = ["MobileNet-V2", "ResNet-V2-50"]
//! ```
//!
//! Command-line flags and their environment variables take precedence over
//! the file.

use gpubench_benchmarks::io::REFERENCE_FILE;
use gpubench_benchmarks::RecognizedModels;
use gpubench_sanity::Tolerance;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        /// Offending path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML or holds invalid values.
    #[error("Invalid config {}: {source}", .path.display())]
    Parse {
        /// Offending path.
        path: PathBuf,
        /// Underlying error.
        source: toml::de::Error,
    },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Sanity check settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SanityConfig {
    /// Absolute tolerance in milliseconds.
    pub tolerance_ms: Tolerance,
    /// Reference corpus file.
    pub reference: PathBuf,
    /// Deep-learning models the log extractor records.
    pub recognized_models: RecognizedModels,
}

impl Default for SanityConfig {
    fn default() -> Self {
        Self {
            tolerance_ms: Tolerance::default(),
            reference: PathBuf::from(REFERENCE_FILE),
            recognized_models: RecognizedModels::default(),
        }
    }
}

impl SanityConfig {
    /// Parse configuration from TOML text. `origin` is used in error messages.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Load `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}
