use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use serde_json::Value;

use crate::error::Result;
use crate::models::{DataTable, Metric, Reading};
use crate::utils::constants::{REQUIRED_COLUMNS, TIME_COLUMN};
use crate::utils::time::{is_valid_time_cell, parse_time_column};

/// Parses raw spreadsheet bytes into a [`DataTable`], locating the header
/// row by scanning for the required column labels.
pub struct WorkbookReader {
    required_columns: Vec<String>,
}

impl WorkbookReader {
    pub fn new() -> Self {
        Self {
            required_columns: REQUIRED_COLUMNS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_required_columns(required_columns: Vec<String>) -> Self {
        Self { required_columns }
    }

    /// Read the first worksheet into a table. A workbook without a header
    /// row yields an empty table, not an error; corrupt bytes are an error.
    pub fn read_table(&self, bytes: &[u8]) -> Result<DataTable> {
        let cursor = Cursor::new(bytes.to_vec());
        let mut workbook = open_workbook_auto_from_rs(cursor)?;

        let Some(range) = workbook.worksheet_range_at(0) else {
            return Ok(DataTable::default());
        };
        let range = range?;
        let rows: Vec<&[Data]> = range.rows().collect();

        let Some(header_idx) = self.find_header_row(&rows) else {
            return Ok(DataTable::default());
        };

        // Header labels keep their column index; unnamed columns are dropped
        let headers: Vec<(usize, String)> = rows[header_idx]
            .iter()
            .enumerate()
            .filter_map(|(idx, cell)| {
                let text = cell_text(cell);
                let text = text.trim();
                if text.is_empty() {
                    None
                } else {
                    Some((idx, text.to_string()))
                }
            })
            .collect();

        let Some(time_idx) = headers
            .iter()
            .find(|(_, label)| label == TIME_COLUMN)
            .map(|(idx, _)| *idx)
        else {
            return Ok(DataTable::default());
        };

        // Structural check on the time column before any date parsing
        let mut time_texts = Vec::new();
        let mut data_rows = Vec::new();
        for row in rows.iter().skip(header_idx + 1) {
            let text = row.get(time_idx).map(cell_text).unwrap_or_default();
            if !is_valid_time_cell(&text) {
                continue;
            }
            time_texts.push(text);
            data_rows.push(*row);
        }

        let timestamps = parse_time_column(&time_texts);

        let mut table = DataTable::new(headers.iter().map(|(_, label)| label.clone()).collect());
        for ((row, text), timestamp) in data_rows.iter().zip(time_texts).zip(timestamps) {
            let mut reading = Reading::new(text);
            reading.timestamp = timestamp;

            for (idx, label) in &headers {
                if *idx == time_idx {
                    continue;
                }
                let Some(cell) = row.get(*idx) else { continue };
                match Metric::from_label(label) {
                    Some(metric) => {
                        if let Some(value) = cell_number(cell) {
                            reading.values.insert(metric, value);
                        }
                    }
                    None => {
                        if let Some(value) = cell_json(cell) {
                            reading.extra.insert(label.clone(), value);
                        }
                    }
                }
            }

            table.readings.push(reading);
        }

        Ok(table)
    }

    /// The header row is the first row whose cell values collectively include
    /// every required column label (verbatim, order-independent).
    fn find_header_row(&self, rows: &[&[Data]]) -> Option<usize> {
        rows.iter().position(|row| {
            self.required_columns.iter().all(|required| {
                row.iter()
                    .any(|cell| cell.get_string().map(str::trim) == Some(required.as_str()))
            })
        })
    }
}

impl Default for WorkbookReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Text rendering of a cell. Native datetime cells render ISO-style, which
/// fails the two-slash structural check just as they did upstream.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        other => other.to_string(),
    }
}

fn cell_number(cell: &Data) -> Option<f64> {
    cell.as_f64()
        .or_else(|| cell.get_string().and_then(|s| s.trim().parse().ok()))
}

fn cell_json(cell: &Data) -> Option<Value> {
    if let Data::Bool(b) = cell {
        return Some(Value::Bool(*b));
    }
    if let Some(number) = cell_number(cell) {
        return serde_json::Number::from_f64(number).map(Value::Number);
    }
    let text = cell_text(cell);
    if text.trim().is_empty() {
        None
    } else {
        Some(Value::String(text))
    }
}
