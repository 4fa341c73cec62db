//! CSV loading for tabular binary-classification data.
//!
//! Supported format:
//! - UTF-8, comma-separated
//! - Optional header row (auto-detected: first row is a header if it contains
//!   any non-numeric, non-empty cell)
//! - Double-quoted fields with embedded commas are handled correctly
//! - The last column is the label and must be `0` or `1`

use std::path::Path;

use tracing::debug;

use crate::data::dataset::Dataset;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Reads and parses a CSV file into a [`Dataset`].
pub fn read_csv(path: &Path) -> Result<Dataset> {
    let bytes = std::fs::read(path)?;
    let ds = parse_csv(&bytes)?;
    debug!(path = %path.display(), rows = ds.len(), features = ds.feature_count(), "loaded csv");
    Ok(ds)
}

/// Parses CSV bytes into features (every column but the last) and 0/1 labels
/// (the last column).
pub fn parse_csv(data: &[u8]) -> Result<Dataset> {
    let text = std::str::from_utf8(data)
        .map_err(|_| Error::Csv("file is not valid UTF-8".into()))?;

    let mut lines = text.lines().peekable();

    // Auto-detect header: skip first line if any cell is non-numeric.
    if let Some(first) = lines.peek() {
        if is_header(first) {
            lines.next();
        }
    }

    let mut inputs: Vec<Vec<f64>> = Vec::new();
    let mut labels: Vec<f64> = Vec::new();

    for (row_idx, line) in lines.enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let cells = parse_csv_row(line);
        if cells.len() < 2 {
            return Err(Error::Csv(format!(
                "row {}: expected at least 2 columns (features + label), got {}",
                row_idx + 1,
                cells.len()
            )));
        }

        let (feature_cells, label_cell) = cells.split_at(cells.len() - 1);
        let feats = parse_floats(feature_cells, row_idx + 1)?;
        let label = parse_label(&label_cell[0], row_idx + 1)?;

        inputs.push(feats);
        labels.push(label);
    }

    if inputs.is_empty() {
        return Err(Error::Csv("no data rows after parsing".into()));
    }

    // Verify all rows have the same feature width.
    let n_feats = inputs[0].len();
    for (i, row) in inputs.iter().enumerate() {
        if row.len() != n_feats {
            return Err(Error::Csv(format!(
                "row {}: feature count {} does not match first row's {}",
                i + 1, row.len(), n_feats
            )));
        }
    }

    Dataset::from_rows(inputs, &labels)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Returns `true` if the row looks like a header (any cell non-numeric).
fn is_header(line: &str) -> bool {
    let cells = parse_csv_row(line);
    cells.iter().any(|c| {
        let t = c.trim();
        !t.is_empty() && t.parse::<f64>().is_err()
    })
}

/// Parses a single CSV row, handling double-quoted fields.
fn parse_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                // Escaped quote inside quoted field.
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn parse_floats(cells: &[String], row_num: usize) -> Result<Vec<f64>> {
    cells.iter()
        .map(|c| {
            c.trim().parse::<f64>().map_err(|_| {
                Error::Csv(format!("row {row_num}: '{c}' is not a valid number"))
            })
        })
        .collect()
}

fn parse_label(cell: &str, row_num: usize) -> Result<f64> {
    match cell.trim().parse::<f64>() {
        Ok(v) if v == 0.0 || v == 1.0 => Ok(v),
        _ => Err(Error::Csv(format!("row {row_num}: label '{cell}' is not 0 or 1"))),
    }
}
