//! Markdown output generation for benchmark reports.
//!
//! Renders a subject [`BenchmarkReport`] as a markdown summary with one table
//! for the fixed microbenchmarks and one for the deep-learning timings.

use crate::report::BenchmarkReport;
use gpubench_core::Metric;
use std::fmt::{self, Write};

fn cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn write_summary(out: &mut impl Write, report: &BenchmarkReport) -> fmt::Result {
    let device = report.device.as_deref().unwrap_or("unknown device");

    writeln!(out, "# Benchmark Summary")?;
    writeln!(out)?;
    writeln!(out, "Device: {device}")?;
    writeln!(out)?;
    writeln!(out, "Generated: {}", chrono::Utc::now().to_rfc3339())?;
    writeln!(out)?;

    writeln!(out, "## Microbenchmarks")?;
    writeln!(out)?;
    writeln!(out, "| Probe | Matrix Size | Metric | Value |")?;
    writeln!(out, "|-------|-------------|--------|-------|")?;
    let gemm_size = report.gemm.matrix_size.map(|s| s.to_string());
    let gemm_size = gemm_size.as_deref().unwrap_or("-");
    writeln!(out, "| cuBLAS | {gemm_size} | Execution time (ms) | {} |", cell(report.gemm.execution_time_ms))?;
    writeln!(out, "| cuBLAS | {gemm_size} | Performance (GFLOPS) | {} |", cell(report.gemm.performance_gflops))?;
    let conv_size = report.conv.matrix_size.map(|s| s.to_string());
    let conv_size = conv_size.as_deref().unwrap_or("-");
    writeln!(out, "| cuDNN | {conv_size} | Convolution time (ms) | {} |", cell(report.conv.convolution_time_ms))?;
    writeln!(out, "| cuDNN | {conv_size} | Activation time (ms) | {} |", cell(report.conv.activation_time_ms))?;
    writeln!(out, "| cuDNN | {conv_size} | Pooling time (ms) | {} |", cell(report.conv.pooling_time_ms))?;
    writeln!(out)?;

    writeln!(out, "## Deep Learning")?;
    writeln!(out)?;
    writeln!(out, "| Model | Inference (ms) | Training (ms) |")?;
    writeln!(out, "|-------|----------------|---------------|")?;
    for (family, timings) in report.deep_learning.families() {
        let inference = report.device.as_deref().and_then(|d| timings.get(Metric::Inference, d));
        let training = report.device.as_deref().and_then(|d| timings.get(Metric::Training, d));
        writeln!(out, "| {family} | {} | {} |", cell(inference), cell(training))?;
    }

    writeln!(out)?;
    writeln!(out, "---")?;
    writeln!(out, "Models measured: {}", report.measured_families())
}

/// Generate a markdown summary from a subject report.
pub fn generate_summary(report: &BenchmarkReport) -> String {
    let mut output = String::new();
    // Writing into a String cannot fail.
    let _ = write_summary(&mut output, report);
    output
}
