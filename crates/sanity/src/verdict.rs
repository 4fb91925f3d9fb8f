// Copyright 2025 GPU Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Comparison verdict types.
//!
//! A [`ComparisonVerdict`] is plain data: every anomaly the comparator finds
//! becomes a [`FailureReason`] rather than an error.

use crate::tolerance::Tolerance;
use gpubench_core::Metric;
use serde::Serialize;
use std::fmt;

/// A subject timing that fell outside tolerance of its reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Deviation {
    /// Metric that deviated.
    pub metric: Metric,
    /// Measured value in milliseconds.
    pub subject: f64,
    /// Reference value in milliseconds.
    pub reference: f64,
}

impl Deviation {
    /// Absolute difference between subject and reference.
    pub fn delta(&self) -> f64 {
        (self.subject - self.reference).abs()
    }
}

/// One itemized reason a family failed the sanity check.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum FailureReason {
    /// The reference has no value for the device under this family.
    ReferenceMissing {
        /// Benchmark family.
        family: String,
        /// Device model looked up.
        device: String,
    },
    /// The subject produced no value for one or both metrics.
    SubjectMissing {
        /// Benchmark family.
        family: String,
        /// Device model looked up.
        device: String,
        /// Metrics without a measured value.
        missing: Vec<Metric>,
    },
    /// At least one metric differs from the reference by more than the tolerance.
    ToleranceExceeded {
        /// Benchmark family.
        family: String,
        /// Device model compared.
        device: String,
        /// Tolerance applied.
        tolerance: Tolerance,
        /// Metrics outside tolerance.
        deviations: Vec<Deviation>,
    },
}

impl FailureReason {
    /// Short name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ReferenceMissing { .. } => "ReferenceMissing",
            Self::SubjectMissing { .. } => "SubjectMissing",
            Self::ToleranceExceeded { .. } => "ToleranceExceeded",
        }
    }

    /// Benchmark family the failure refers to.
    pub fn family(&self) -> &str {
        match self {
            Self::ReferenceMissing { family, .. }
            | Self::SubjectMissing { family, .. }
            | Self::ToleranceExceeded { family, .. } => family,
        }
    }

    /// Human-readable description without kind and family.
    pub fn detail(&self) -> String {
        match self {
            Self::ReferenceMissing { device, .. } => {
                format!("device '{device}' not found in reference")
            }
            Self::SubjectMissing {
                device, missing, ..
            } => {
                let metrics: Vec<_> = missing.iter().map(Metric::name).collect();
                format!("no {} measurement for '{device}'", metrics.join(" or "))
            }
            Self::ToleranceExceeded {
                tolerance,
                deviations,
                ..
            } => deviations
                .iter()
                .map(|d| {
                    format!(
                        "{} {} ms vs reference {} ms (off by {:.2}, tolerance {})",
                        d.metric,
                        d.subject,
                        d.reference,
                        d.delta(),
                        tolerance
                    )
                })
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} — {}", self.kind(), self.family(), self.detail())
    }
}

/// Outcome of one sanity comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonVerdict {
    passed: bool,
    failures: Vec<FailureReason>,
    skipped: Vec<String>,
}

impl ComparisonVerdict {
    /// Build a verdict. `passed` is derived from `failures`.
    pub fn new(failures: Vec<FailureReason>, skipped: Vec<String>) -> Self {
        Self {
            passed: failures.is_empty(),
            failures,
            skipped,
        }
    }

    /// True iff there are no failures.
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Failures in subject family order.
    pub fn failures(&self) -> &[FailureReason] {
        &self.failures
    }

    /// Subject families absent from the reference; informational only.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Number of failures.
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}
