//! Subject benchmark report types.
//!
//! A [`BenchmarkReport`] bundles everything the log extractor pulls out of one
//! benchmark run: the two fixed microbenchmark blocks and the per-model
//! deep-learning timings keyed by the device under test.

use gpubench_core::{CanonicalRecord, ConvMetrics, GemmMetrics};
use serde::{Deserialize, Serialize};

/// Everything measured in one benchmark run on one device.
///
/// Serialized with the section names used by the benchmark suite:
/// `CUBLAS`, `cuDNN` and `DL`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Device model the deep-learning timings are keyed by.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// Dense matrix-multiply probe.
    #[serde(rename = "CUBLAS", default)]
    pub gemm: GemmMetrics,
    /// Convolution primitive probe.
    #[serde(rename = "cuDNN", default)]
    pub conv: ConvMetrics,
    /// Per-model inference and training timings.
    #[serde(rename = "DL", default)]
    pub deep_learning: CanonicalRecord,
}

impl BenchmarkReport {
    /// Create an empty report for `device`.
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: Some(device.into()),
            ..Self::default()
        }
    }

    /// Number of deep-learning families holding at least one value.
    pub fn measured_families(&self) -> usize {
        self.deep_learning
            .families()
            .filter(|(_, timings)| !timings.is_empty())
            .count()
    }
}
