//! Console log extraction.
//!
//! Turns the free-form output of a benchmark run into a [`BenchmarkReport`].
//! The log may contain, in any order and mixed with unrelated text:
//!
//! - one cuBLAS block (`Matrix Size` / `Execution Time` / `Performance`),
//! - one cuDNN block (`Matrix Size` / `Conv Time` / `Activation Time` / `Pooling Time`),
//! - any number of AI Benchmark sections, each introduced by a numbered
//!   header such as `1/12. ResNet-V2-50` and followed by timing lines such as
//!   `18.4 - inference | batch=16, size=224x224: 42.3 ± 1.1 ms`.
//!
//! Deep-learning sections are read in a single ordered pass with a
//! [`ModelCursor`]: a timing line belongs to whichever header most recently
//! preceded it. Numbers that fail to parse leave their field unset and are
//! logged; they never abort extraction.

use crate::models::RecognizedModels;
use crate::report::BenchmarkReport;
use gpubench_core::{CanonicalRecord, ConvMetrics, GemmMetrics, MatrixSize, Metric};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::{debug, warn};

static GEMM_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"Matrix Size: (\d+x\d+)\r?\nExecution Time: ([\d.]+) ms\r?\nPerformance: ([\d.]+) GFLOPS",
    )
    .expect("cuBLAS block pattern is valid")
});

static CONV_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"Matrix Size: (\d+x\d+)\r?\nConv Time: ([\d.]+) ms\r?\nActivation Time: ([\d.]+) ms\r?\nPooling Time: ([\d.]+) ms",
    )
    .expect("cuDNN block pattern is valid")
});

static MODEL_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)/(\d+)\.\s(.+)$").expect("model header pattern is valid")
});

static TIMING_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d+\.\d+) - (inference|training)\s+\| batch=(\d+), size=(\d+x\d+): ([\d.]+) ± [\d.]+ ms",
    )
    .expect("timing line pattern is valid")
});

/// Which model subsequent timing lines belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModelCursor {
    /// No model header has been seen yet.
    #[default]
    NoModel,
    /// Timing lines attach to this model.
    Model(String),
}

impl ModelCursor {
    /// Name of the current model, if any.
    pub fn current(&self) -> Option<&str> {
        match self {
            Self::NoModel => None,
            Self::Model(name) => Some(name.as_str()),
        }
    }
}

/// A numbered model header, e.g. `3/12. Inception-V4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelHeader<'a> {
    /// Position of the model in the run.
    pub index: u32,
    /// Number of models in the run.
    pub total: u32,
    /// Trimmed model name.
    pub name: &'a str,
}

/// One inference or training timing line.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingLine<'a> {
    /// Test identifier, e.g. `18.4`.
    pub test_id: &'a str,
    /// Whether the line reports inference or training.
    pub metric: Metric,
    /// Batch size, unset if the token overflowed.
    pub batch_size: Option<u32>,
    /// Input tensor size token, e.g. `224x224`.
    pub input_size: &'a str,
    /// Mean duration in milliseconds, unset if malformed.
    pub mean_ms: Option<f64>,
}

/// Classification of one log line.
#[derive(Debug, Clone, PartialEq)]
pub enum LogLine<'a> {
    /// A numbered model header.
    Header(ModelHeader<'a>),
    /// An inference or training timing line.
    Timing(TimingLine<'a>),
    /// Anything else.
    Other,
}

/// Classify a single line of log output.
pub fn classify_line(line: &str) -> LogLine<'_> {
    let line = line.trim_end_matches('\r');

    if let Some(caps) = MODEL_HEADER.captures(line) {
        // A blank name still moves the cursor; it matches no recognized model.
        return LogLine::Header(ModelHeader {
            index: caps[1].parse().unwrap_or(0),
            total: caps[2].parse().unwrap_or(0),
            name: caps.get(3).map_or("", |m| m.as_str()).trim(),
        });
    }

    if let Some(caps) = TIMING_LINE.captures(line) {
        let metric = if &caps[2] == "inference" {
            Metric::Inference
        } else {
            Metric::Training
        };
        return LogLine::Timing(TimingLine {
            test_id: caps.get(1).map_or("", |m| m.as_str()),
            metric,
            batch_size: caps[3].parse().ok(),
            input_size: caps.get(4).map_or("", |m| m.as_str()),
            mean_ms: parse_number(&caps[5], "mean duration"),
        });
    }

    LogLine::Other
}

/// Extracts benchmark results from console logs.
#[derive(Debug, Clone, Default)]
pub struct LogExtractor {
    models: RecognizedModels,
}

impl LogExtractor {
    /// Create an extractor that records only `models`.
    pub fn new(models: RecognizedModels) -> Self {
        Self { models }
    }

    /// Models this extractor records.
    pub fn models(&self) -> &RecognizedModels {
        &self.models
    }

    /// Extract every block from `text`, keying deep-learning timings by `device`.
    pub fn extract(&self, text: &str, device: &str) -> BenchmarkReport {
        let report = BenchmarkReport {
            device: Some(device.to_string()),
            gemm: extract_gemm(text),
            conv: extract_conv(text),
            deep_learning: self.extract_deep_learning(text.lines(), device),
        };
        debug!(
            device,
            families = report.measured_families(),
            gemm = !report.gemm.is_unset(),
            conv = !report.conv.is_unset(),
            "Extracted benchmark log"
        );
        report
    }

    /// Single ordered pass over `lines` collecting deep-learning timings.
    ///
    /// Every recognized model is present in the result, empty if the log
    /// holds no timings for it.
    pub fn extract_deep_learning<'a, I>(&self, lines: I, device: &str) -> CanonicalRecord
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut record = CanonicalRecord::new();
        for name in self.models.iter() {
            record.family_entry(name);
        }

        let mut cursor = ModelCursor::NoModel;
        for (index, line) in lines.into_iter().enumerate() {
            match classify_line(line) {
                LogLine::Header(header) => {
                    cursor = ModelCursor::Model(header.name.to_string());
                }
                LogLine::Timing(timing) => {
                    self.attach(&cursor, &timing, device, &mut record, index + 1);
                }
                LogLine::Other => {}
            }
        }
        record
    }

    fn attach(
        &self,
        cursor: &ModelCursor,
        timing: &TimingLine<'_>,
        device: &str,
        record: &mut CanonicalRecord,
        line_no: usize,
    ) {
        let Some(model) = cursor.current() else {
            debug!(line = line_no, "Timing line before any model header, ignored");
            return;
        };
        if !self.models.contains(model) {
            debug!(line = line_no, model, "Timing line for unrecognized model, ignored");
            return;
        }
        match timing.mean_ms {
            Some(value) => record.record(model, timing.metric, device, Some(value)),
            None => warn!(
                line = line_no,
                model,
                metric = %timing.metric,
                "Malformed duration, leaving value unset"
            ),
        }
    }
}

/// Extract the cuBLAS block. Absent or malformed fields stay unset.
pub fn extract_gemm(text: &str) -> GemmMetrics {
    let Some(caps) = GEMM_BLOCK.captures(text) else {
        return GemmMetrics::default();
    };
    GemmMetrics {
        matrix_size: parse_size(&caps, 1),
        execution_time_ms: parse_number(&caps[2], "cuBLAS execution time"),
        performance_gflops: parse_number(&caps[3], "cuBLAS performance"),
    }
}

/// Extract the cuDNN block. Absent or malformed fields stay unset.
pub fn extract_conv(text: &str) -> ConvMetrics {
    let Some(caps) = CONV_BLOCK.captures(text) else {
        return ConvMetrics::default();
    };
    ConvMetrics {
        matrix_size: parse_size(&caps, 1),
        convolution_time_ms: parse_number(&caps[2], "cuDNN convolution time"),
        activation_time_ms: parse_number(&caps[3], "cuDNN activation time"),
        pooling_time_ms: parse_number(&caps[4], "cuDNN pooling time"),
    }
}

/// Extract with the default recognized models.
pub fn parse_log(text: &str, device: &str) -> BenchmarkReport {
    LogExtractor::default().extract(text, device)
}

fn parse_size(caps: &Captures<'_>, group: usize) -> Option<MatrixSize> {
    let token = caps.get(group)?.as_str();
    match token.parse() {
        Ok(size) => Some(size),
        Err(e) => {
            warn!(token, error = %e, "Malformed matrix size, leaving value unset");
            None
        }
    }
}

fn parse_number(token: &str, field: &str) -> Option<f64> {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            warn!(token, field, "Malformed number, leaving value unset");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEVICE: &str = "GeForce RTX 4090";

    const SAMPLE_LOG: &str = "\
Running cuBLAS benchmark...
Matrix Size: 4096x4096
Execution Time: 12.50 ms
Performance: 10995.12 GFLOPS

Running cuDNN benchmark...
Matrix Size: 1024x1024
Conv Time: 0.85 ms
Activation Time: 0.12 ms
Pooling Time: 0.09 ms

>>   AI-Benchmark - 0.1.2

1/12. MobileNet-V2

1.1 - inference | batch=50, size=224x224: 38.1 ± 0.6 ms
1.2 - training  | batch=50, size=224x224: 121.2 ± 1.4 ms

5/12. ResNet-V2-50

5.1 - inference | batch=16, size=224x224: 42.3 ± 1.1 ms
5.2 - training  | batch=16, size=224x224: 133.7 ± 2.0 ms
";

    #[test]
    fn test_resnet_scenario() {
        let log = "1/12. ResNet-V2-50\n\
                   18.4 - inference | batch=16, size=224x224: 42.3 ± 1.1 ms\n\
                   18.4 - training  | batch=16, size=224x224: 133.7 ± 2.0 ms\n";
        let record = LogExtractor::default().extract_deep_learning(log.lines(), DEVICE);
        assert_eq!(record.get("ResNet-V2-50", Metric::Inference, DEVICE), Some(42.3));
        assert_eq!(record.get("ResNet-V2-50", Metric::Training, DEVICE), Some(133.7));
    }

    #[test]
    fn test_full_log() {
        let report = parse_log(SAMPLE_LOG, DEVICE);

        assert_eq!(report.device.as_deref(), Some(DEVICE));
        assert_eq!(report.gemm.matrix_size, Some(MatrixSize::new(4096, 4096)));
        assert_eq!(report.gemm.execution_time_ms, Some(12.5));
        assert_eq!(report.gemm.performance_gflops, Some(10995.12));

        assert_eq!(report.conv.matrix_size, Some(MatrixSize::new(1024, 1024)));
        assert_eq!(report.conv.convolution_time_ms, Some(0.85));
        assert_eq!(report.conv.activation_time_ms, Some(0.12));
        assert_eq!(report.conv.pooling_time_ms, Some(0.09));

        let dl = &report.deep_learning;
        assert_eq!(dl.get("MobileNet-V2", Metric::Inference, DEVICE), Some(38.1));
        assert_eq!(dl.get("MobileNet-V2", Metric::Training, DEVICE), Some(121.2));
        assert_eq!(dl.get("ResNet-V2-50", Metric::Training, DEVICE), Some(133.7));
        assert_eq!(report.measured_families(), 2);
    }

    #[test]
    fn test_recognized_models_are_seeded() {
        let report = parse_log("", DEVICE);
        assert_eq!(report.deep_learning.len(), 12);
        assert!(report.deep_learning.family("Pixel-RNN").unwrap().is_empty());
        assert!(report.gemm.is_unset());
        assert!(report.conv.is_unset());
    }

    #[test]
    fn test_unrecognized_model_is_skipped() {
        let log = "2/12. SqueezeNet\n\
                   2.1 - inference | batch=8, size=224x224: 5.0 ± 0.1 ms\n\
                   2.2 - training  | batch=8, size=224x224: 9.0 ± 0.1 ms\n";
        let record = LogExtractor::default().extract_deep_learning(log.lines(), DEVICE);
        assert!(record.family("SqueezeNet").is_none());
        assert!(record.families().all(|(_, timings)| timings.is_empty()));
    }

    #[test]
    fn test_cursor_survives_blank_and_unrelated_lines() {
        let log = "7/12. VGG-16\n\n\
                   loading weights...\n\
                   \n\
                   7.1 - inference | batch=20, size=224x224: 55.0 ± 0.5 ms\n";
        let record = LogExtractor::default().extract_deep_learning(log.lines(), DEVICE);
        assert_eq!(record.get("VGG-16", Metric::Inference, DEVICE), Some(55.0));
    }

    #[test]
    fn test_timing_after_unrecognized_header_not_attributed_to_previous_model() {
        let log = "1/12. MobileNet-V2\n\
                   1.1 - inference | batch=50, size=224x224: 38.1 ± 0.6 ms\n\
                   2/12. SqueezeNet\n\
                   2.2 - training  | batch=8, size=224x224: 9.0 ± 0.1 ms\n";
        let record = LogExtractor::default().extract_deep_learning(log.lines(), DEVICE);
        assert_eq!(record.get("MobileNet-V2", Metric::Inference, DEVICE), Some(38.1));
        assert_eq!(record.get("MobileNet-V2", Metric::Training, DEVICE), None);
    }

    #[test]
    fn test_timing_after_blank_header_not_attributed_to_previous_model() {
        let log = "1/12. MobileNet-V2\n\
                   1.1 - inference | batch=50, size=224x224: 38.1 ± 0.6 ms\n\
                   2/12.  \n\
                   2.1 - inference | batch=50, size=224x224: 999.0 ± 0.1 ms\n";
        let record = LogExtractor::default().extract_deep_learning(log.lines(), DEVICE);
        assert_eq!(record.get("MobileNet-V2", Metric::Inference, DEVICE), Some(38.1));
        assert!(!record.contains_family(""));
    }

    #[test]
    fn test_indented_timing_line_is_not_a_timing() {
        assert_eq!(
            classify_line("  1.1 - inference | batch=50, size=224x224: 38.1 ± 0.6 ms"),
            LogLine::Other
        );
    }

    #[test]
    fn test_timing_before_header_is_ignored() {
        let log = "1.1 - inference | batch=50, size=224x224: 38.1 ± 0.6 ms\n";
        let record = LogExtractor::default().extract_deep_learning(log.lines(), DEVICE);
        assert!(record.families().all(|(_, timings)| timings.is_empty()));
    }

    #[test]
    fn test_malformed_number_leaves_field_unset() {
        let log = "Matrix Size: 2048x2048\n\
                   Execution Time: 1.2.3 ms\n\
                   Performance: 900.5 GFLOPS\n\
                   1/12. ICNet\n\
                   9.1 - inference | batch=5, size=1024x1536: 1..2 ± 0.1 ms\n\
                   9.2 - training  | batch=5, size=1024x1536: 88.0 ± 0.1 ms\n";
        let report = parse_log(log, DEVICE);
        assert_eq!(report.gemm.execution_time_ms, None);
        assert_eq!(report.gemm.performance_gflops, Some(900.5));
        assert_eq!(report.gemm.matrix_size, Some(MatrixSize::new(2048, 2048)));
        assert_eq!(report.deep_learning.get("ICNet", Metric::Inference, DEVICE), None);
        assert_eq!(report.deep_learning.get("ICNet", Metric::Training, DEVICE), Some(88.0));
    }

    #[test]
    fn test_blocks_are_independent() {
        let log = "Matrix Size: 512x512\nConv Time: 1.0 ms\nActivation Time: 2.0 ms\nPooling Time: 3.0 ms\n";
        let report = parse_log(log, DEVICE);
        assert!(report.gemm.is_unset());
        assert_eq!(report.conv.pooling_time_ms, Some(3.0));
    }

    #[test]
    fn test_crlf_line_endings() {
        let log = "Matrix Size: 64x64\r\nExecution Time: 0.5 ms\r\nPerformance: 1.0 GFLOPS\r\n\
                   1/12. DeepLab\r\n\
                   11.1 - inference | batch=2, size=512x512: 70.5 ± 0.3 ms\r\n";
        let report = parse_log(log, DEVICE);
        assert_eq!(report.gemm.execution_time_ms, Some(0.5));
        assert_eq!(report.deep_learning.get("DeepLab", Metric::Inference, DEVICE), Some(70.5));
    }

    #[test]
    fn test_last_timing_line_wins() {
        let log = "1/12. MobileNet-V2\n\
                   1.1 - inference | batch=50, size=224x224: 38.1 ± 0.6 ms\n\
                   1.2 - inference | batch=1, size=224x224: 6.4 ± 0.2 ms\n";
        let record = LogExtractor::default().extract_deep_learning(log.lines(), DEVICE);
        assert_eq!(record.get("MobileNet-V2", Metric::Inference, DEVICE), Some(6.4));
    }

    #[test]
    fn test_custom_model_set() {
        let extractor = LogExtractor::new(RecognizedModels::new(["SqueezeNet"]));
        let log = "2/12. SqueezeNet\n2.1 - inference | batch=8, size=224x224: 5.0 ± 0.1 ms\n";
        let record = extractor.extract_deep_learning(log.lines(), DEVICE);
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("SqueezeNet", Metric::Inference, DEVICE), Some(5.0));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let first = parse_log(SAMPLE_LOG, DEVICE);
        let second = parse_log(SAMPLE_LOG, DEVICE);
        assert_eq!(first, second);
    }

    #[test]
    fn test_classify_line() {
        assert_eq!(
            classify_line("3/12. Inception-V4  "),
            LogLine::Header(ModelHeader { index: 3, total: 12, name: "Inception-V4" })
        );
        match classify_line("18.4 - training  | batch=16, size=224x224: 133.7 ± 2.0 ms") {
            LogLine::Timing(t) => {
                assert_eq!(t.test_id, "18.4");
                assert_eq!(t.metric, Metric::Training);
                assert_eq!(t.batch_size, Some(16));
                assert_eq!(t.input_size, "224x224");
                assert_eq!(t.mean_ms, Some(133.7));
            }
            other => panic!("expected timing line, got {other:?}"),
        }
        assert_eq!(classify_line("Device: GeForce RTX 4090"), LogLine::Other);
        assert_eq!(
            classify_line("2/12.  "),
            LogLine::Header(ModelHeader { index: 2, total: 12, name: "" })
        );
    }

    #[test]
    fn test_cursor_current() {
        assert_eq!(ModelCursor::NoModel.current(), None);
        assert_eq!(ModelCursor::Model("ICNet".into()).current(), Some("ICNet"));
    }
}
