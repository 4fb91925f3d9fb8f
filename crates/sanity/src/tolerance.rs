// Copyright 2025 GPU Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Absolute timing tolerance.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when building a tolerance.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToleranceError {
    /// Tolerance is negative, NaN or infinite.
    #[error("Tolerance must be a finite, non-negative number of milliseconds, got {0}")]
    Invalid(f64),
}

/// Absolute bound, in milliseconds, within which a subject timing matches
/// its reference.
///
/// Two values match when `|subject - reference| <= tolerance`. The bound is
/// not relative to the magnitude of either value.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Tolerance(f64);

impl Tolerance {
    /// Default tolerance in milliseconds.
    pub const DEFAULT_MS: f64 = 10.0;

    /// Create a tolerance of `ms` milliseconds.
    pub fn new(ms: f64) -> Result<Self, ToleranceError> {
        if ms.is_finite() && ms >= 0.0 {
            Ok(Self(ms))
        } else {
            Err(ToleranceError::Invalid(ms))
        }
    }

    /// Bound in milliseconds.
    pub fn ms(&self) -> f64 {
        self.0
    }

    /// Whether `subject` is within tolerance of `reference`.
    pub fn accepts(&self, subject: f64, reference: f64) -> bool {
        (subject - reference).abs() <= self.0
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self(Self::DEFAULT_MS)
    }
}

impl TryFrom<f64> for Tolerance {
    type Error = ToleranceError;

    fn try_from(ms: f64) -> Result<Self, Self::Error> {
        Self::new(ms)
    }
}

impl From<Tolerance> for f64 {
    fn from(tolerance: Tolerance) -> Self {
        tolerance.0
    }
}

impl fmt::Display for Tolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ms", self.0)
    }
}
