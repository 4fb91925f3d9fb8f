// Copyright 2025 GPU Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Single-valued microbenchmark blocks.
//!
//! Unlike [`crate::CanonicalRecord`], these blocks describe one measurement
//! run on the device under test rather than a per-device table. Every field
//! is optional: a block that was not found in the log leaves all fields unset,
//! and a malformed number leaves only its own field unset.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Square or rectangular problem size written as `ROWSxCOLS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatrixSize {
    /// Number of rows.
    pub rows: u32,
    /// Number of columns.
    pub cols: u32,
}

impl MatrixSize {
    /// Create a size from its dimensions.
    pub fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }
}

impl fmt::Display for MatrixSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Error returned when a matrix size token is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid matrix size '{0}': expected ROWSxCOLS")]
pub struct ParseMatrixSizeError(String);

impl FromStr for MatrixSize {
    type Err = ParseMatrixSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseMatrixSizeError(s.to_string());
        let (rows, cols) = s.trim().split_once('x').ok_or_else(invalid)?;
        Ok(Self {
            rows: rows.parse().map_err(|_| invalid())?,
            cols: cols.parse().map_err(|_| invalid())?,
        })
    }
}

impl Serialize for MatrixSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MatrixSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Dense matrix-multiply probe (the cuBLAS block of a benchmark log).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GemmMetrics {
    /// Problem size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix_size: Option<MatrixSize>,
    /// Kernel execution time in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<f64>,
    /// Achieved throughput in GFLOPS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_gflops: Option<f64>,
}

impl GemmMetrics {
    /// True when no field was measured.
    pub fn is_unset(&self) -> bool {
        self.matrix_size.is_none()
            && self.execution_time_ms.is_none()
            && self.performance_gflops.is_none()
    }
}

/// Convolution primitive probe (the cuDNN block of a benchmark log).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvMetrics {
    /// Problem size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix_size: Option<MatrixSize>,
    /// Forward convolution time in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convolution_time_ms: Option<f64>,
    /// Activation time in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_time_ms: Option<f64>,
    /// Pooling time in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pooling_time_ms: Option<f64>,
}

impl ConvMetrics {
    /// True when no field was measured.
    pub fn is_unset(&self) -> bool {
        self.matrix_size.is_none()
            && self.convolution_time_ms.is_none()
            && self.activation_time_ms.is_none()
            && self.pooling_time_ms.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_matrix_size() {
        assert_eq!("1024x1024".parse::<MatrixSize>().unwrap(), MatrixSize::new(1024, 1024));
        assert_eq!(MatrixSize::new(256, 512).to_string(), "256x512");
        assert!("1024".parse::<MatrixSize>().is_err());
        assert!("axb".parse::<MatrixSize>().is_err());
    }

    #[test]
    fn test_unset_fields_are_omitted() {
        let gemm = GemmMetrics {
            matrix_size: Some(MatrixSize::new(4096, 4096)),
            execution_time_ms: None,
            performance_gflops: Some(0.0),
        };
        let json = serde_json::to_value(&gemm).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"matrix_size": "4096x4096", "performance_gflops": 0.0})
        );
    }

    #[test]
    fn test_zero_is_distinct_from_unset() {
        let back: GemmMetrics =
            serde_json::from_str(r#"{"performance_gflops": 0.0}"#).unwrap();
        assert_eq!(back.performance_gflops, Some(0.0));
        assert_eq!(back.execution_time_ms, None);
        assert!(!back.is_unset());
    }

    #[test]
    fn test_default_conv_is_unset() {
        assert!(ConvMetrics::default().is_unset());
        assert_eq!(serde_json::to_string(&ConvMetrics::default()).unwrap(), "{}");
    }
}
