// Copyright 2025 GPU Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Canonical record types for GPU Bench.
//!
//! Every producer in the workspace (the spreadsheet normalizer and the
//! console log extractor) builds the types defined here, and the sanity
//! comparator consumes them.
//!
//! # Modules
//!
//! - [`record`] - The per-device [`CanonicalRecord`] keyed by family and metric
//! - [`fixed`] - Single-valued microbenchmark blocks ([`GemmMetrics`], [`ConvMetrics`])
//! - [`error`] - Structural errors raised while normalizing input

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod error;
pub mod fixed;
pub mod record;

pub use error::SchemaError;
pub use fixed::{ConvMetrics, GemmMetrics, MatrixSize};
pub use record::{CanonicalRecord, FamilyTimings, Metric};
