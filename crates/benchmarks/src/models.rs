//! The closed set of deep-learning benchmarks the log extractor records.
//!
//! Timing lines that belong to a model outside this set are parsed and then
//! discarded. The set is a value handed to the extractor, so a reference
//! corpus that covers more architectures only needs a configuration change.

use serde::{Deserialize, Serialize};

/// Architectures reported by the AI Benchmark suite that the reference
/// corpus covers.
pub const DEFAULT_RECOGNIZED_MODELS: &[&str] = &[
    "MobileNet-V2",
    "Inception-V3",
    "Inception-V4",
    "Inception-ResNet-V2",
    "ResNet-V2-50",
    "ResNet-V2-152",
    "VGG-16",
    "Nvidia-SPADE",
    "ICNet",
    "PSPNet",
    "DeepLab",
    "Pixel-RNN",
];

/// Ordered, de-duplicated set of recognized model names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct RecognizedModels {
    names: Vec<String>,
}

impl RecognizedModels {
    /// Build a set from names. Surrounding whitespace is trimmed, blanks and
    /// duplicates are dropped, first occurrence order is kept.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if !name.is_empty() && !out.iter().any(|n| n == name) {
                out.push(name.to_string());
            }
        }
        Self { names: out }
    }

    /// Whether `name` is recognized.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Names in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of recognized names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when the set is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for RecognizedModels {
    fn default() -> Self {
        Self::new(DEFAULT_RECOGNIZED_MODELS)
    }
}

impl From<Vec<String>> for RecognizedModels {
    fn from(names: Vec<String>) -> Self {
        Self::new(names)
    }
}

impl From<RecognizedModels> for Vec<String> {
    fn from(models: RecognizedModels) -> Self {
        models.names
    }
}
