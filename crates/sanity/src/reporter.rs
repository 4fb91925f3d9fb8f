// Copyright 2025 GPU Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Human-readable rendering of a [`ComparisonVerdict`].
//!
//! Text output is one line per skipped family, one line per failure of the
//! form `<Kind>: <family> — <detail>`, and a closing summary line.

use crate::verdict::ComparisonVerdict;
use std::fmt::{self, Write};

/// Process exit status for a successful check.
pub const EXIT_PASSED: u8 = 0;

/// Process exit status when any check failed.
pub const EXIT_FAILED: u8 = 1;

/// Final summary line.
pub fn summary_line(verdict: &ComparisonVerdict) -> String {
    if verdict.passed() {
        "all tests passed".to_string()
    } else {
        format!("{} test(s) failed", verdict.failure_count())
    }
}

/// Exit status for `verdict`.
pub fn exit_code(verdict: &ComparisonVerdict) -> u8 {
    if verdict.passed() {
        EXIT_PASSED
    } else {
        EXIT_FAILED
    }
}

/// Plain text rendering, usable with `{}`.
pub struct TextReport<'a>(pub &'a ComparisonVerdict);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for family in self.0.skipped() {
            writeln!(f, "Skipped: {family} — not present in reference")?;
        }
        for failure in self.0.failures() {
            writeln!(f, "{failure}")?;
        }
        writeln!(f, "{}", summary_line(self.0))
    }
}

/// Render `verdict` as plain text.
pub fn render_text(verdict: &ComparisonVerdict) -> String {
    TextReport(verdict).to_string()
}

fn write_markdown(out: &mut impl Write, verdict: &ComparisonVerdict, device: &str) -> fmt::Result {
    writeln!(out, "# Sanity Check Report")?;
    writeln!(out)?;
    writeln!(out, "Device: {device}")?;
    writeln!(out)?;
    writeln!(out, "Generated: {}", chrono::Utc::now().to_rfc3339())?;
    writeln!(out)?;
    writeln!(out, "**Result:** {}", summary_line(verdict))?;

    if !verdict.failures().is_empty() {
        writeln!(out)?;
        writeln!(out, "## Failures")?;
        writeln!(out)?;
        writeln!(out, "| Kind | Family | Detail |")?;
        writeln!(out, "|------|--------|--------|")?;
        for failure in verdict.failures() {
            writeln!(
                out,
                "| {} | {} | {} |",
                failure.kind(),
                failure.family(),
                failure.detail()
            )?;
        }
    }

    if !verdict.skipped().is_empty() {
        writeln!(out)?;
        writeln!(out, "## Skipped")?;
        writeln!(out)?;
        for family in verdict.skipped() {
            writeln!(out, "- {family}")?;
        }
    }
    Ok(())
}

/// Render `verdict` as a markdown report for `device`.
pub fn render_markdown(verdict: &ComparisonVerdict, device: &str) -> String {
    let mut output = String::new();
    // Writing into a String cannot fail.
    let _ = write_markdown(&mut output, verdict, device);
    output
}
