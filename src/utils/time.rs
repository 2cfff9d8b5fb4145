use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{Result, ServiceError};
use crate::utils::constants::{DATETIME_FORMAT, DATE_FORMAT, TIME_SEPARATOR_COUNT};

/// Structural check applied before any date parsing: non-blank and exactly
/// two '/' separators. Garbage that happens to contain two slashes passes
/// here and is resolved during parsing.
pub fn is_valid_time_cell(text: &str) -> bool {
    !text.trim().is_empty() && text.matches('/').count() == TIME_SEPARATOR_COUNT
}

/// Parse the whole time column with `%d/%m/%Y %H:%M:%S`; if any value fails,
/// re-parse the whole column with `%d/%m/%Y` only. Values that still fail
/// become `None` (kept in the table, but failing every range comparison).
pub fn parse_time_column(values: &[String]) -> Vec<Option<NaiveDateTime>> {
    let full: Vec<Option<NaiveDateTime>> = values
        .iter()
        .map(|v| NaiveDateTime::parse_from_str(v.trim(), DATETIME_FORMAT).ok())
        .collect();

    if full.iter().all(Option::is_some) {
        return full;
    }

    values
        .iter()
        .map(|v| {
            NaiveDate::parse_from_str(v.trim(), DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .collect()
}

/// Parse a query-supplied date bound with day-first semantics. Strings
/// beginning with `year-month-day` are normalized to `day/month/year` first
/// (any time-of-day suffix is discarded; comparison is by calendar date only).
pub fn parse_query_date(raw: &str) -> Result<NaiveDate> {
    let normalized = normalize_date_str(raw);
    let text = normalized.trim();

    if let Ok(dt) = NaiveDateTime::parse_from_str(text, DATETIME_FORMAT) {
        return Ok(dt.date());
    }

    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|_| ServiceError::InvalidQuery(format!("unparseable date bound: '{}'", raw)))
}

/// Rewrite a `yyyy-mm-dd`-prefixed string as `dd/mm/yyyy`; anything else is
/// returned unchanged.
fn normalize_date_str(raw: &str) -> String {
    if let Some(prefix) = raw.get(..10) {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return date.format(DATE_FORMAT).to_string();
        }
    }
    raw.to_string()
}
