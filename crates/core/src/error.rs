// Copyright 2025 GPU Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Structural errors for benchmark normalization.
//!
//! A [`SchemaError`] means the input cannot be mapped onto the canonical
//! record at all. It aborts the parse call that raised it; no partial record
//! is returned. Content-level gaps (a blank cell, a malformed number) are not
//! errors and surface as unset values instead.

use thiserror::Error;

/// Errors raised when tabular input cannot be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The table does not carry both header rows.
    #[error("Expected two header rows, found {found}")]
    MissingHeader {
        /// Number of header rows present.
        found: usize,
    },

    /// The header has a device column but no benchmark columns.
    #[error("Header has no benchmark columns after the device column")]
    NoFamilies,

    /// Benchmark columns must come in inference/training pairs.
    #[error("Expected inference/training column pairs, found {count} benchmark columns")]
    OddColumnCount {
        /// Number of non-key columns in the header.
        count: usize,
    },

    /// Both columns of a pair carry the same role.
    #[error("Column {column} ('{label}') repeats the role of the column it is paired with")]
    DuplicateRole {
        /// Zero-based column index of the offending column.
        column: usize,
        /// Flattened label of the offending column.
        label: String,
    },

    /// The two columns of a pair belong to different benchmark groups.
    #[error("Columns {column} ('{first}') and {next} ('{second}') pair different benchmark groups", next = .column + 1)]
    SplitFamily {
        /// Zero-based column index of the inference column.
        column: usize,
        /// Flattened label of the inference column.
        first: String,
        /// Flattened label of the training column.
        second: String,
    },

    /// A header label does not yield a family name.
    #[error("Column {column} has an unusable header label '{label}'")]
    InvalidLabel {
        /// Zero-based column index.
        column: usize,
        /// Flattened label text.
        label: String,
    },

    /// A data row carries measurements but no device name.
    #[error("Row {row} has measurements but no device name")]
    MissingDevice {
        /// One-based row number within the data section.
        row: usize,
    },
}

/// Result type for normalization operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odd_column_message() {
        let err = SchemaError::OddColumnCount { count: 5 };
        assert_eq!(
            err.to_string(),
            "Expected inference/training column pairs, found 5 benchmark columns"
        );
    }

    #[test]
    fn test_split_family_names_both_columns() {
        let err = SchemaError::SplitFamily {
            column: 3,
            first: "VGG-16 Inference".to_string(),
            second: "ICNet Training".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Columns 3"));
        assert!(msg.contains("and 4"));
        assert!(msg.contains("ICNet Training"));
    }
}
