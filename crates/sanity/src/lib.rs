// Copyright 2025 GPU Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Sanity checking of GPU benchmark results.
//!
//! Compares a device's freshly measured [`CanonicalRecord`] against the
//! reference corpus within an absolute [`Tolerance`] and reports the outcome.
//!
//! # Example
//!
//! ```
//! use gpubench_core::{CanonicalRecord, Metric};
//! use gpubench_sanity::{compare, reporter, Tolerance};
//!
//! let mut reference = CanonicalRecord::new();
//! reference.record("VGG-16", Metric::Inference, "GeForce RTX 4090", Some(50.0));
//! reference.record("VGG-16", Metric::Training, "GeForce RTX 4090", Some(170.0));
//!
//! let mut subject = CanonicalRecord::new();
//! subject.record("VGG-16", Metric::Inference, "GeForce RTX 4090", Some(52.5));
//! subject.record("VGG-16", Metric::Training, "GeForce RTX 4090", Some(168.0));
//!
//! let verdict = compare(&subject, &reference, "GeForce RTX 4090", Tolerance::default());
//! assert!(verdict.passed());
//! assert_eq!(reporter::summary_line(&verdict), "all tests passed");
//! ```
//!
//! [`CanonicalRecord`]: gpubench_core::CanonicalRecord

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod comparator;
pub mod reporter;
pub mod tolerance;
pub mod verdict;

pub use comparator::{compare, SanityComparator};
pub use tolerance::{Tolerance, ToleranceError};
pub use verdict::{ComparisonVerdict, Deviation, FailureReason};
