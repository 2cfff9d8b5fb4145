use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::column_stats::summarize;
use crate::models::{DataTable, Metric, SeverityLevel};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelStat {
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub levels: BTreeMap<String, LevelStat>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
    pub qc: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub total: usize,
    pub summary: BTreeMap<String, MetricSummary>,
}

pub struct ComplianceAnalyzer;

impl ComplianceAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Band counts and percentages per regulated metric present in the
    /// table, always over the full (unfiltered) row set. Rows without a
    /// value for the metric, and rows in the `[1, 1.1)` ratio gap,
    /// contribute to no band, so percentages may sum below 100.
    pub fn summarize(&self, table: &DataTable) -> SummaryReport {
        let total = table.len();
        let mut summary = BTreeMap::new();

        for metric in Metric::ALL {
            let Some(limit) = metric.limit() else { continue };
            let label = metric.column_label();
            if !table.has_column(label) {
                continue;
            }

            let mut levels = BTreeMap::new();
            for level in SeverityLevel::ALL {
                let count = table
                    .readings
                    .iter()
                    .filter(|r| {
                        r.value(metric)
                            .is_some_and(|v| SeverityLevel::classify(v, limit) == Some(level))
                    })
                    .count();
                let percent = if total > 0 {
                    round1(count as f64 / total as f64 * 100.0)
                } else {
                    0.0
                };
                levels.insert(level.label().to_string(), LevelStat { count, percent });
            }

            let values = table.column_values(label);
            let stats = if values.is_empty() {
                None
            } else {
                Some(summarize(&values))
            };

            summary.insert(
                label.to_string(),
                MetricSummary {
                    levels,
                    min: stats.map(|s| s.min),
                    max: stats.map(|s| s.max),
                    avg: stats.map(|s| s.avg),
                    qc: limit,
                },
            );
        }

        SummaryReport { total, summary }
    }
}

impl Default for ComplianceAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
