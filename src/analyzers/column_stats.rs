use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::DataTable;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

pub struct StatsAnalyzer;

impl StatsAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Per-column min/max/mean over the full table, excluding the time
    /// column. Columns with no numeric values are omitted.
    pub fn column_stats(&self, table: &DataTable) -> BTreeMap<String, ColumnStats> {
        let mut stats = BTreeMap::new();
        for label in table.numeric_columns() {
            let values = table.column_values(&label);
            if values.is_empty() {
                continue;
            }
            stats.insert(label, summarize(&values));
        }
        stats
    }
}

impl Default for StatsAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn summarize(values: &[f64]) -> ColumnStats {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0f64;

    for &value in values {
        if value < min {
            min = value;
        }
        if value > max {
            max = value;
        }
        sum += value;
    }

    ColumnStats {
        min,
        max,
        avg: sum / values.len() as f64,
    }
}
