// Copyright 2025 GPU Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Tolerance-based sanity comparison.
//!
//! Checks a freshly measured subject record against the reference corpus for
//! one device model. For each subject family, in order:
//!
//! 1. a family the reference does not cover is skipped;
//! 2. a device missing from either reference metric is `ReferenceMissing`;
//! 3. a subject without both metrics for the device is `SubjectMissing`;
//! 4. otherwise both metrics must satisfy `|subject - reference| <= tolerance`,
//!    and any that do not are reported together as one `ToleranceExceeded`.
//!
//! The comparison is a pure function of its inputs and never fails.

use crate::tolerance::Tolerance;
use crate::verdict::{ComparisonVerdict, Deviation, FailureReason};
use gpubench_core::{CanonicalRecord, FamilyTimings, Metric};

/// Compare `subject` against `reference` for `device`.
pub fn compare(
    subject: &CanonicalRecord,
    reference: &CanonicalRecord,
    device: &str,
    tolerance: Tolerance,
) -> ComparisonVerdict {
    let mut failures = Vec::new();
    let mut skipped = Vec::new();

    for (family, measured) in subject.families() {
        let Some(expected) = reference.family(family) else {
            skipped.push(family.to_string());
            continue;
        };
        if let Some(failure) = check_family(family, measured, expected, device, tolerance) {
            failures.push(failure);
        }
    }

    ComparisonVerdict::new(failures, skipped)
}

fn check_family(
    family: &str,
    measured: &FamilyTimings,
    expected: &FamilyTimings,
    device: &str,
    tolerance: Tolerance,
) -> Option<FailureReason> {
    if !Metric::ALL.iter().all(|&m| expected.contains_device(m, device)) {
        return Some(FailureReason::ReferenceMissing {
            family: family.to_string(),
            device: device.to_string(),
        });
    }

    let missing: Vec<Metric> = Metric::ALL
        .into_iter()
        .filter(|&m| measured.get(m, device).is_none())
        .collect();
    if !missing.is_empty() {
        return Some(FailureReason::SubjectMissing {
            family: family.to_string(),
            device: device.to_string(),
            missing,
        });
    }

    let deviations: Vec<Deviation> = Metric::ALL
        .into_iter()
        .filter_map(|metric| {
            let subject = measured.get(metric, device)?;
            let reference = expected.get(metric, device)?;
            (!tolerance.accepts(subject, reference)).then_some(Deviation {
                metric,
                subject,
                reference,
            })
        })
        .collect();

    (!deviations.is_empty()).then(|| FailureReason::ToleranceExceeded {
        family: family.to_string(),
        device: device.to_string(),
        tolerance,
        deviations,
    })
}

/// Comparator bound to a fixed tolerance.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SanityComparator {
    tolerance: Tolerance,
}

impl SanityComparator {
    /// Create a comparator with `tolerance`.
    pub fn new(tolerance: Tolerance) -> Self {
        Self { tolerance }
    }

    /// Tolerance applied by this comparator.
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Compare `subject` against `reference` for `device`.
    pub fn check(
        &self,
        subject: &CanonicalRecord,
        reference: &CanonicalRecord,
        device: &str,
    ) -> ComparisonVerdict {
        compare(subject, reference, device, self.tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEVICE: &str = "GeForce RTX 4090";

    fn record(entries: &[(&str, Option<f64>, Option<f64>)], device: &str) -> CanonicalRecord {
        let mut record = CanonicalRecord::new();
        for (family, inference, training) in entries {
            record.record(*family, Metric::Inference, device, *inference);
            record.record(*family, Metric::Training, device, *training);
        }
        record
    }

    #[test]
    fn test_within_tolerance_passes() {
        let subject = record(&[("VGG-16", Some(55.0), Some(170.0))], DEVICE);
        let reference = record(&[("VGG-16", Some(50.0), Some(175.5))], DEVICE);
        let verdict = compare(&subject, &reference, DEVICE, Tolerance::default());
        assert!(verdict.passed());
        assert!(verdict.skipped().is_empty());
    }

    #[test]
    fn test_boundary_exactly_at_tolerance_passes() {
        let subject = record(&[("VGG-16", Some(110.0), Some(110.0))], DEVICE);
        let reference = record(&[("VGG-16", Some(100.0), Some(100.0))], DEVICE);
        assert!(compare(&subject, &reference, DEVICE, Tolerance::default()).passed());
    }

    #[test]
    fn test_just_over_tolerance_fails() {
        let subject = record(&[("VGG-16", Some(110.01), Some(100.0))], DEVICE);
        let reference = record(&[("VGG-16", Some(100.0), Some(100.0))], DEVICE);
        let verdict = compare(&subject, &reference, DEVICE, Tolerance::default());

        assert_eq!(
            verdict.failures(),
            &[FailureReason::ToleranceExceeded {
                family: "VGG-16".into(),
                device: DEVICE.into(),
                tolerance: Tolerance::default(),
                deviations: vec![Deviation {
                    metric: Metric::Inference,
                    subject: 110.01,
                    reference: 100.0,
                }],
            }]
        );
    }

    #[test]
    fn test_both_metrics_reported_in_one_failure() {
        let subject = record(&[("ICNet", Some(200.0), Some(10.0))], DEVICE);
        let reference = record(&[("ICNet", Some(100.0), Some(100.0))], DEVICE);
        let verdict = compare(&subject, &reference, DEVICE, Tolerance::default());

        assert_eq!(verdict.failure_count(), 1);
        match &verdict.failures()[0] {
            FailureReason::ToleranceExceeded { deviations, .. } => {
                let metrics: Vec<_> = deviations.iter().map(|d| d.metric).collect();
                assert_eq!(metrics, vec![Metric::Inference, Metric::Training]);
            }
            other => panic!("unexpected failure {other:?}"),
        }
    }

    #[test]
    fn test_missing_reference_device() {
        let subject = record(&[("ResNet-V2-50", Some(42.3), Some(133.7))], "X");
        let reference = record(&[("ResNet-V2-50", Some(40.0), Some(130.0))], DEVICE);
        let verdict = compare(&subject, &reference, "X", Tolerance::default());

        assert_eq!(
            verdict.failures(),
            &[FailureReason::ReferenceMissing {
                family: "ResNet-V2-50".into(),
                device: "X".into(),
            }]
        );
    }

    #[test]
    fn test_reference_missing_one_metric() {
        let subject = record(&[("DeepLab", Some(70.0), Some(200.0))], DEVICE);
        let reference = record(&[("DeepLab", Some(70.0), None)], DEVICE);
        let verdict = compare(&subject, &reference, DEVICE, Tolerance::default());
        assert_eq!(verdict.failures()[0].kind(), "ReferenceMissing");
    }

    #[test]
    fn test_reference_missing_takes_precedence_over_subject_missing() {
        let subject = record(&[("DeepLab", None, None)], DEVICE);
        let reference = record(&[("DeepLab", Some(70.0), Some(200.0))], "other");
        let verdict = compare(&subject, &reference, DEVICE, Tolerance::default());
        assert_eq!(verdict.failure_count(), 1);
        assert_eq!(verdict.failures()[0].kind(), "ReferenceMissing");
    }

    #[test]
    fn test_subject_missing_metric() {
        let subject = record(&[("PSPNet", Some(270.0), None)], DEVICE);
        let reference = record(&[("PSPNet", Some(271.0), Some(900.0))], DEVICE);
        let verdict = compare(&subject, &reference, DEVICE, Tolerance::default());

        assert_eq!(
            verdict.failures(),
            &[FailureReason::SubjectMissing {
                family: "PSPNet".into(),
                device: DEVICE.into(),
                missing: vec![Metric::Training],
            }]
        );
    }

    #[test]
    fn test_family_absent_from_reference_is_skipped() {
        let subject = record(&[("Pixel-RNN", Some(1.0), Some(2.0))], DEVICE);
        let reference = record(&[("VGG-16", Some(1.0), Some(2.0))], DEVICE);
        let verdict = compare(&subject, &reference, DEVICE, Tolerance::default());

        assert!(verdict.passed());
        assert_eq!(verdict.skipped(), &["Pixel-RNN".to_string()]);
    }

    #[test]
    fn test_failures_follow_subject_order() {
        let subject = record(
            &[
                ("DeepLab", None, None),
                ("ICNet", Some(500.0), Some(500.0)),
                ("VGG-16", Some(1.0), Some(1.0)),
            ],
            DEVICE,
        );
        let reference = record(
            &[
                ("DeepLab", Some(1.0), Some(1.0)),
                ("ICNet", Some(1.0), Some(1.0)),
            ],
            DEVICE,
        );
        let verdict = compare(&subject, &reference, DEVICE, Tolerance::default());
        let families: Vec<_> = verdict.failures().iter().map(|f| f.family()).collect();
        assert_eq!(families, vec!["DeepLab", "ICNet"]);
        assert_eq!(verdict.skipped(), &["VGG-16".to_string()]);
    }

    #[test]
    fn test_custom_tolerance() {
        let subject = record(&[("VGG-16", Some(101.0), Some(100.0))], DEVICE);
        let reference = record(&[("VGG-16", Some(100.0), Some(100.0))], DEVICE);
        let strict = SanityComparator::new(Tolerance::new(0.5).unwrap());
        assert!(!strict.check(&subject, &reference, DEVICE).passed());
        assert!(SanityComparator::default().check(&subject, &reference, DEVICE).passed());
    }

    #[test]
    fn test_comparison_is_repeatable() {
        let subject = record(&[("ICNet", Some(500.0), None)], DEVICE);
        let reference = record(&[("ICNet", Some(1.0), Some(1.0))], DEVICE);
        let first = compare(&subject, &reference, DEVICE, Tolerance::default());
        let second = compare(&subject, &reference, DEVICE, Tolerance::default());
        assert_eq!(first, second);
    }
}
