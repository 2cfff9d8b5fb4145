use chrono::NaiveDate;

use crate::models::{DataTable, Metric, SeverityLevel};

/// Optional query predicates. Absent parameters impose no constraint;
/// present ones compose by logical AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterParams {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub metric: Option<String>,
    pub level: Option<String>,
    pub value_min: Option<f64>,
    pub value_max: Option<f64>,
}

pub struct RowFilter {
    params: FilterParams,
}

impl RowFilter {
    pub fn new(params: FilterParams) -> Self {
        Self { params }
    }

    /// Narrow the table to rows satisfying every present predicate.
    /// Date bounds are inclusive and compare calendar dates only; rows with
    /// an unparseable timestamp never satisfy a bound.
    pub fn apply(&self, table: &DataTable) -> DataTable {
        let mut readings = table.readings.clone();

        if let Some(from) = self.params.from_date {
            readings.retain(|r| r.date().is_some_and(|d| d >= from));
        }
        if let Some(to) = self.params.to_date {
            readings.retain(|r| r.date().is_some_and(|d| d <= to));
        }

        // Level and value predicates engage only when the metric names a
        // column of the table; otherwise they fall through silently.
        if let Some(label) = self
            .params
            .metric
            .as_deref()
            .filter(|label| table.has_column(label))
        {
            let limit = Metric::from_label(label).and_then(|m| m.limit());
            if let (Some(limit), Some(level)) = (limit, self.level_filter()) {
                readings.retain(|r| {
                    r.numeric(label)
                        .is_some_and(|v| SeverityLevel::classify(v, limit) == Some(level))
                });
            }

            if let Some(min) = self.params.value_min {
                readings.retain(|r| r.numeric(label).is_some_and(|v| v >= min));
            }
            if let Some(max) = self.params.value_max {
                readings.retain(|r| r.numeric(label).is_some_and(|v| v <= max));
            }
        }

        DataTable {
            columns: table.columns.clone(),
            readings,
        }
    }

    /// The level predicate engages only when `level` is present, recognized,
    /// and not `"all"`.
    fn level_filter(&self) -> Option<SeverityLevel> {
        self.params
            .level
            .as_deref()
            .filter(|level| *level != "all")
            .and_then(SeverityLevel::parse)
    }
}
