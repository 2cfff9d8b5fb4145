use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::Metric;
use crate::utils::constants::TIME_COLUMN;

/// One row of the dataset: a parsed timestamp, the raw time-column text, the
/// known metric values, and an overflow map for unrecognized columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: Option<NaiveDateTime>,
    pub time_text: String,
    pub values: BTreeMap<Metric, f64>,
    pub extra: BTreeMap<String, Value>,
}

impl Reading {
    pub fn new(time_text: impl Into<String>) -> Self {
        Self {
            timestamp: None,
            time_text: time_text.into(),
            values: BTreeMap::new(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_value(mut self, metric: Metric, value: f64) -> Self {
        self.values.insert(metric, value);
        self
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.values.get(&metric).copied()
    }

    /// Calendar date used for range filtering; `None` when the timestamp
    /// never parsed, which fails every range comparison.
    pub fn date(&self) -> Option<NaiveDate> {
        self.timestamp.map(|t| t.date())
    }

    /// Numeric value for a column label: known metric columns first, then
    /// numeric overflow columns.
    pub fn numeric(&self, label: &str) -> Option<f64> {
        if let Some(metric) = Metric::from_label(label) {
            return self.value(metric);
        }
        self.extra.get(label).and_then(Value::as_f64)
    }

    /// Row object keyed by verbatim column labels. The time column
    /// serializes as ISO-8601, or null when unparseable.
    pub fn to_row(&self, columns: &[String]) -> Map<String, Value> {
        let mut row = Map::new();
        for label in columns {
            let value = if label == TIME_COLUMN {
                match self.timestamp {
                    Some(ts) => Value::String(ts.format("%Y-%m-%dT%H:%M:%S").to_string()),
                    None => Value::Null,
                }
            } else if let Some(metric) = Metric::from_label(label) {
                self.value(metric)
                    .and_then(|v| serde_json::Number::from_f64(v).map(Value::Number))
                    .unwrap_or(Value::Null)
            } else {
                self.extra.get(label).cloned().unwrap_or(Value::Null)
            };
            row.insert(label.clone(), value);
        }
        row
    }
}

/// The parsed, validated row set of the currently uploaded spreadsheet,
/// together with its ordered header labels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub readings: Vec<Reading>,
}

impl DataTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            readings: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn has_column(&self, label: &str) -> bool {
        self.columns.iter().any(|c| c == label)
    }

    /// Column labels eligible for aggregate statistics: every column except
    /// the time column whose present values are all numeric.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|label| label.as_str() != TIME_COLUMN)
            .filter(|label| {
                if Metric::from_label(label).is_some() {
                    return true;
                }
                self.readings
                    .iter()
                    .filter_map(|r| r.extra.get(label.as_str()))
                    .all(|v| v.is_number())
            })
            .cloned()
            .collect()
    }

    /// Non-null numeric values of a column, in row order.
    pub fn column_values(&self, label: &str) -> Vec<f64> {
        self.readings
            .iter()
            .filter_map(|r| r.numeric(label))
            .collect()
    }
}
