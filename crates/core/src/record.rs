// Copyright 2025 GPU Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! The canonical per-device benchmark record.
//!
//! A [`CanonicalRecord`] maps a benchmark family (for example a network
//! architecture such as `ResNet-V2-50`) to a pair of per-device timing maps,
//! one per [`Metric`]. Both the spreadsheet normalizer and the log extractor
//! produce this shape, and the sanity comparator consumes it.
//!
//! Unset values are represented by absence from the device map. The API uses
//! `Option<f64>` at every boundary so that "not measured" never collapses into
//! zero, and non-finite values are never stored.
//!
//! # Serialized form
//!
//! ```text
//! {
//!   "ResNet-V2-50": {
//!     "inference_time": { "GeForce RTX 4090": 42.3 },
//!     "training_time":  { "GeForce RTX 4090": 133.7 }
//!   }
//! }
//! ```

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Timing metric recorded for every family and device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    /// Mean inference duration in milliseconds.
    #[serde(rename = "inference_time")]
    Inference,
    /// Mean training-step duration in milliseconds.
    #[serde(rename = "training_time")]
    Training,
}

impl Metric {
    /// Both metrics in canonical order.
    pub const ALL: [Metric; 2] = [Metric::Inference, Metric::Training];

    /// Key used for this metric in the serialized record.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Inference => "inference_time",
            Self::Training => "training_time",
        }
    }

    /// Short human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Inference => "inference",
            Self::Training => "training",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-device timings for one benchmark family.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FamilyTimings {
    #[serde(
        default,
        alias = "Inference time",
        deserialize_with = "measured_only"
    )]
    inference_time: BTreeMap<String, f64>,
    #[serde(
        default,
        alias = "Training time",
        deserialize_with = "measured_only"
    )]
    training_time: BTreeMap<String, f64>,
}

impl FamilyTimings {
    /// Create an empty timing block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Device map for one metric.
    pub fn metric(&self, metric: Metric) -> &BTreeMap<String, f64> {
        match metric {
            Metric::Inference => &self.inference_time,
            Metric::Training => &self.training_time,
        }
    }

    fn metric_mut(&mut self, metric: Metric) -> &mut BTreeMap<String, f64> {
        match metric {
            Metric::Inference => &mut self.inference_time,
            Metric::Training => &mut self.training_time,
        }
    }

    /// Value measured for `device`, if any.
    pub fn get(&self, metric: Metric, device: &str) -> Option<f64> {
        self.metric(metric).get(device).copied()
    }

    /// Whether `device` has a value for `metric`.
    pub fn contains_device(&self, metric: Metric, device: &str) -> bool {
        self.metric(metric).contains_key(device)
    }

    /// Set or clear the value for `device`.
    ///
    /// `None` and non-finite values leave the device unset.
    pub fn set(&mut self, metric: Metric, device: impl Into<String>, value: Option<f64>) {
        let device = device.into();
        match value.filter(|v| v.is_finite()) {
            Some(v) => {
                self.metric_mut(metric).insert(device, v);
            }
            None => {
                self.metric_mut(metric).remove(&device);
            }
        }
    }

    /// True when neither metric holds a value.
    pub fn is_empty(&self) -> bool {
        self.inference_time.is_empty() && self.training_time.is_empty()
    }
}

/// Reads a device map, dropping `null` entries left behind by spreadsheet exports.
fn measured_only<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Option<f64>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(device, value)| value.filter(|v| v.is_finite()).map(|v| (device, v)))
        .collect())
}

/// Canonical benchmark record: family → metric → device → milliseconds.
///
/// Families iterate in the order they were first added: header order for a
/// normalized table, declaration order of the recognized models for an
/// extracted log, document order for a deserialized file. A family present in
/// one record need not exist in another; use [`CanonicalRecord::family`] to
/// look it up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalRecord {
    families: Vec<(String, FamilyTimings)>,
}

impl CanonicalRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, family: &str) -> Option<usize> {
        self.families.iter().position(|(name, _)| name == family)
    }

    /// Timings for `family`, if the record covers it.
    pub fn family(&self, family: &str) -> Option<&FamilyTimings> {
        self.position(family).map(|index| &self.families[index].1)
    }

    /// Whether the record covers `family`.
    pub fn contains_family(&self, family: &str) -> bool {
        self.position(family).is_some()
    }

    /// Ensure `family` exists, returning its timings for population.
    ///
    /// A new family is appended after every existing one.
    pub fn family_entry(&mut self, family: impl Into<String>) -> &mut FamilyTimings {
        let family = family.into();
        let index = match self.position(&family) {
            Some(index) => index,
            None => {
                self.families.push((family, FamilyTimings::default()));
                self.families.len() - 1
            }
        };
        &mut self.families[index].1
    }

    /// Record one value. Creates the family when missing.
    pub fn record(
        &mut self,
        family: impl Into<String>,
        metric: Metric,
        device: impl Into<String>,
        value: Option<f64>,
    ) {
        self.family_entry(family).set(metric, device, value);
    }

    /// Value for `family`/`metric`/`device`, if measured.
    pub fn get(&self, family: &str, metric: Metric, device: &str) -> Option<f64> {
        self.family(family)?.get(metric, device)
    }

    /// Iterate over families in order.
    pub fn families(&self) -> impl Iterator<Item = (&str, &FamilyTimings)> {
        self.families.iter().map(|(name, timings)| (name.as_str(), timings))
    }

    /// Family names in order.
    pub fn family_names(&self) -> impl Iterator<Item = &str> {
        self.families.iter().map(|(name, _)| name.as_str())
    }

    /// Number of families.
    pub fn len(&self) -> usize {
        self.families.len()
    }

    /// True when the record covers no family.
    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }
}

impl Serialize for CanonicalRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.families.iter().map(|(name, timings)| (name, timings)))
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = CanonicalRecord;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of benchmark families")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut record = CanonicalRecord::new();
        while let Some((name, timings)) = map.next_entry::<String, FamilyTimings>()? {
            *record.family_entry(name) = timings;
        }
        Ok(record)
    }
}

impl<'de> Deserialize<'de> for CanonicalRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordVisitor)
    }
}
