//! Device model discovery.
//!
//! The device under test is identified from `nvidia-smi -L` output, e.g.
//! `GPU 0: NVIDIA GeForce RTX 4090 (UUID: GPU-...)` yields `GeForce RTX 4090`,
//! which is the naming used by the reference corpus.

use once_cell::sync::Lazy;
use regex::Regex;
use std::process::Command;
use thiserror::Error;
use tracing::debug;

static DEVICE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"NVIDIA\s+(GeForce\s+RTX\s+\d+)").expect("device name pattern is valid")
});

/// Errors raised while detecting the device model.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The query tool could not be started.
    #[error("Failed to run nvidia-smi: {0}")]
    Spawn(#[from] std::io::Error),

    /// The query tool exited unsuccessfully.
    #[error("nvidia-smi exited with {status}: {stderr}")]
    Failed {
        /// Exit status description.
        status: String,
        /// Captured standard error.
        stderr: String,
    },

    /// No supported device name in the output.
    #[error("No supported GPU model found in: {0}")]
    NotFound(String),
}

/// Extract the first supported device model name from `nvidia-smi -L` output.
pub fn parse_device_name(output: &str) -> Option<String> {
    DEVICE_NAME
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Run `nvidia-smi -L` and parse the device model from its output.
pub fn detect_device() -> Result<String, DeviceError> {
    let output = Command::new("nvidia-smi").arg("-L").output()?;
    if !output.status.success() {
        return Err(DeviceError::Failed {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let device = parse_device_name(&stdout)
        .ok_or_else(|| DeviceError::NotFound(stdout.trim().to_string()))?;
    debug!(device = %device, "Detected device");
    Ok(device)
}
