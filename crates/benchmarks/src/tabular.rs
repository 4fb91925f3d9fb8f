//! Spreadsheet normalization.
//!
//! The reference corpus is published as a spreadsheet with a two-row header:
//!
//! ```text
//! GPU              | ResNet-V2-50 |          | VGG-16    |          | ...
//!                  | Inference    | Training | Inference | Training | ...
//! GeForce RTX 4090 | 42.3         | 133.7    | 55.0      | 170.2    | ...
//! ```
//!
//! The first row groups columns by benchmark family (merged cells export as
//! one filled cell followed by blanks), the second labels each column's role.
//! Columns after the device column are read in inference/training pairs and
//! flattened into a [`CanonicalRecord`].

use crate::io::IoError;
use gpubench_core::error::Result;
use gpubench_core::{CanonicalRecord, Metric, SchemaError};
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// A table with a two-row header, as delivered by a spreadsheet export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// First header row: benchmark family groups.
    pub group_row: Vec<String>,
    /// Second header row: column roles (`Inference` / `Training`).
    pub role_row: Vec<String>,
    /// Data rows; the first cell of each is the device model name.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Split raw records into the two header rows and the data rows.
    pub fn from_records(records: Vec<Vec<String>>) -> Result<Self> {
        let mut records = records.into_iter();
        match (records.next(), records.next()) {
            (Some(group_row), Some(role_row)) => Ok(Self {
                group_row,
                role_row,
                rows: records.collect(),
            }),
            (first, _) => Err(SchemaError::MissingHeader {
                found: usize::from(first.is_some()),
            }),
        }
    }

    /// Read a CSV export. Rows may have differing lengths.
    pub fn from_csv_reader<R: Read>(reader: R) -> std::result::Result<Self, IoError> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut records = Vec::new();
        for record in csv.records() {
            let record = record?;
            records.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self::from_records(records)?)
    }

    /// Read a CSV export from disk.
    pub fn from_csv_path(path: impl AsRef<Path>) -> std::result::Result<Self, IoError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| IoError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_csv_reader(file)
    }
}

/// Flatten the two header rows into one label per column.
///
/// Cells are joined with a space and trimmed. A blank group cell after the
/// device column inherits the group to its left.
pub fn flatten_header(group_row: &[String], role_row: &[String]) -> Vec<String> {
    let width = group_row.len().max(role_row.len());
    let groups = fill_groups(group_row, width);
    (0..width)
        .map(|i| {
            let role = role_row.get(i).map_or("", |s| s.trim());
            format!("{} {}", groups[i], role).trim().to_string()
        })
        .collect()
}

fn fill_groups(group_row: &[String], width: usize) -> Vec<String> {
    let mut groups = Vec::with_capacity(width);
    let mut last = String::new();
    for i in 0..width {
        let cell = group_row.get(i).map_or("", |s| s.trim());
        if i == 0 {
            groups.push(cell.to_string());
            continue;
        }
        if !cell.is_empty() {
            last = cell.to_string();
        }
        groups.push(last.clone());
    }
    groups
}

/// Derive the family name from a flattened column label.
///
/// The trailing role token is dropped and any remaining `" Inference"` is
/// removed, so `"X Inference"` and `"X Training"` both give `"X"`. A label
/// without a role token is returned as-is. Returns `None` for blank labels.
pub fn family_name(label: &str) -> Option<String> {
    let label = label.trim();
    let head = label.rsplit_once(' ').map_or(label, |(head, _)| head);
    let name = head.replace(" Inference", "");
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn header_width(row: &[String]) -> usize {
    row.iter()
        .rposition(|cell| !cell.trim().is_empty())
        .map_or(0, |last| last + 1)
}

fn role_of(cell: Option<&String>) -> Option<Metric> {
    let cell = cell?.trim();
    if cell.eq_ignore_ascii_case("inference") {
        Some(Metric::Inference)
    } else if cell.eq_ignore_ascii_case("training") {
        Some(Metric::Training)
    } else {
        None
    }
}

#[derive(Debug)]
struct ColumnPair {
    family: String,
    inference: usize,
    training: usize,
}

fn column_pairs(table: &Table) -> Result<Vec<ColumnPair>> {
    // Spreadsheet exports pad rows with empty trailing columns.
    let width = header_width(&table.group_row).max(header_width(&table.role_row));
    let mut labels = flatten_header(&table.group_row, &table.role_row);
    labels.truncate(width);
    let groups = fill_groups(&table.group_row, width);

    if labels.len() < 2 {
        return Err(SchemaError::NoFamilies);
    }
    let count = labels.len() - 1;
    if count % 2 != 0 {
        return Err(SchemaError::OddColumnCount { count });
    }

    let mut pairs = Vec::with_capacity(count / 2);
    for first in (1..labels.len()).step_by(2) {
        let second = first + 1;
        let roles = (
            role_of(table.role_row.get(first)),
            role_of(table.role_row.get(second)),
        );
        let (inference, training) = match roles {
            (Some(a), Some(b)) if a == b => {
                return Err(SchemaError::DuplicateRole {
                    column: second,
                    label: labels[second].clone(),
                })
            }
            (Some(Metric::Training), _) | (_, Some(Metric::Inference)) => {
                warn!(
                    column = first,
                    label = labels[first].as_str(),
                    "Training column precedes inference column, reading pair in role order"
                );
                (second, first)
            }
            _ => (first, second),
        };

        if groups[first] != groups[second] {
            return Err(SchemaError::SplitFamily {
                column: first,
                first: labels[first].clone(),
                second: labels[second].clone(),
            });
        }

        let family = match family_name(&labels[first]) {
            Some(name) if !groups[first].is_empty() => name,
            _ => {
                return Err(SchemaError::InvalidLabel {
                    column: first,
                    label: labels[first].clone(),
                })
            }
        };
        pairs.push(ColumnPair {
            family,
            inference,
            training,
        });
    }
    Ok(pairs)
}

fn parse_cell(row: &[String], column: usize, row_no: usize) -> Option<f64> {
    let cell = row.get(column).map_or("", |s| s.trim());
    if cell.is_empty() {
        return None;
    }
    match cell.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            warn!(row = row_no, column, cell, "Non-numeric cell, leaving value unset");
            None
        }
    }
}

/// Normalize a two-header-row table into a canonical record.
///
/// # Errors
///
/// Returns a [`SchemaError`] when the header cannot be paired into
/// inference/training columns or a data row has no device name. No partial
/// record is returned.
pub fn normalize(table: &Table) -> Result<CanonicalRecord> {
    let pairs = column_pairs(table)?;

    let mut record = CanonicalRecord::new();
    for pair in &pairs {
        record.family_entry(pair.family.as_str());
    }

    let mut devices = 0usize;
    for (index, row) in table.rows.iter().enumerate() {
        let row_no = index + 1;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let device = row
            .first()
            .map(|cell| cell.trim())
            .filter(|cell| !cell.is_empty())
            .ok_or(SchemaError::MissingDevice { row: row_no })?;

        for pair in &pairs {
            record.record(
                pair.family.as_str(),
                Metric::Inference,
                device,
                parse_cell(row, pair.inference, row_no),
            );
            record.record(
                pair.family.as_str(),
                Metric::Training,
                device,
                parse_cell(row, pair.training, row_no),
            );
        }
        devices += 1;
    }

    debug!(families = pairs.len(), devices, "Normalized benchmark table");
    Ok(record)
}
