use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use super::AppState;
use crate::analyzers::{ComplianceAnalyzer, StatsAnalyzer};
use crate::error::{Result, ServiceError};
use crate::models::DataTable;
use crate::processors::{paginate, FilterParams, RowFilter};
use crate::utils::constants::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use crate::utils::time::parse_query_date;

/// Raw query parameters of `GET /api/data`. Everything arrives as text and
/// is parsed by hand so that a bad argument surfaces through the caught-error
/// payload instead of an extractor rejection; empty strings count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataQuery {
    pub from_time: Option<String>,
    pub to_time: Option<String>,
    pub metric: Option<String>,
    pub level: Option<String>,
    pub value_min: Option<String>,
    pub value_max: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl DataQuery {
    fn filter_params(&self) -> Result<FilterParams> {
        Ok(FilterParams {
            from_date: parse_opt_date(&self.from_time)?,
            to_date: parse_opt_date(&self.to_time)?,
            metric: non_empty(&self.metric),
            level: non_empty(&self.level),
            value_min: parse_opt_f64(&self.value_min, "value_min")?,
            value_max: parse_opt_f64(&self.value_max, "value_max")?,
        })
    }

    fn page(&self) -> Result<usize> {
        Ok(parse_opt_usize(&self.page, "page")?.unwrap_or(DEFAULT_PAGE))
    }

    fn page_size(&self) -> Result<usize> {
        Ok(parse_opt_usize(&self.page_size, "page_size")?.unwrap_or(DEFAULT_PAGE_SIZE))
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

fn parse_opt_date(value: &Option<String>) -> Result<Option<chrono::NaiveDate>> {
    match non_empty(value) {
        Some(raw) => parse_query_date(&raw).map(Some),
        None => Ok(None),
    }
}

fn parse_opt_f64(value: &Option<String>, name: &str) -> Result<Option<f64>> {
    match non_empty(value) {
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ServiceError::InvalidQuery(format!("invalid {}: '{}'", name, raw))),
        None => Ok(None),
    }
}

fn parse_opt_usize(value: &Option<String>, name: &str) -> Result<Option<usize>> {
    match non_empty(value) {
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|_| ServiceError::InvalidQuery(format!("invalid {}: '{}'", name, raw))),
        None => Ok(None),
    }
}

/// Every query endpoint re-reads and re-parses the stored bytes; there is no
/// caching between requests. Parsing runs on the blocking pool.
async fn load_table(state: &AppState) -> Result<DataTable> {
    let store = state.store.clone();
    let reader = state.reader.clone();
    tokio::task::spawn_blocking(move || match store.fetch()? {
        Some(bytes) => reader.read_table(&bytes),
        None => Ok(DataTable::default()),
    })
    .await?
}

pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    match upload_inner(&state, &mut multipart).await {
        Ok(file_name) => {
            debug!(file = %file_name, "dataset replaced");
            (StatusCode::OK, Json(json!({ "success": true })))
        }
        Err(err @ (ServiceError::UploadRejected(_) | ServiceError::Multipart(_))) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": err.to_string() })),
        ),
        Err(err) => {
            error!(error = %err, "upload failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string() })),
            )
        }
    }
}

async fn upload_inner(state: &AppState, multipart: &mut Multipart) -> Result<String> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if file_name.is_empty() {
            return Err(ServiceError::UploadRejected("No selected file".to_string()));
        }

        let lower = file_name.to_lowercase();
        if !lower.ends_with(".xlsx") && !lower.ends_with(".xls") {
            return Err(ServiceError::UploadRejected(
                "File must be .xlsx or .xls".to_string(),
            ));
        }

        let bytes = field.bytes().await?;
        state.store.replace(&bytes)?;
        return Ok(file_name);
    }

    Err(ServiceError::UploadRejected("No file part".to_string()))
}

pub async fn data(
    State(state): State<AppState>,
    Query(query): Query<DataQuery>,
) -> (StatusCode, Json<Value>) {
    match data_inner(&state, &query).await {
        Ok(body) => (StatusCode::OK, Json(body)),
        Err(err) => {
            warn!(error = %err, "data query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "data": [],
                    "total": 0,
                    "page": 1,
                    "total_pages": 0,
                    "error": err.to_string(),
                })),
            )
        }
    }
}

async fn data_inner(state: &AppState, query: &DataQuery) -> Result<Value> {
    let table = load_table(state).await?;
    if table.is_empty() {
        return Ok(json!({ "data": [], "total": 0, "page": 1, "total_pages": 0 }));
    }

    debug!(
        from_time = ?query.from_time,
        to_time = ?query.to_time,
        metric = ?query.metric,
        level = ?query.level,
        rows = table.len(),
        "data query"
    );

    let filtered = RowFilter::new(query.filter_params()?).apply(&table);
    let page = paginate(&filtered.readings, query.page()?, query.page_size()?)?;

    let rows: Vec<Value> = page
        .items
        .iter()
        .map(|reading| Value::Object(reading.to_row(&filtered.columns)))
        .collect();

    Ok(json!({
        "data": rows,
        "total": page.total,
        "page": page.page,
        "page_size": page.page_size,
        "total_pages": page.total_pages,
    }))
}

pub async fn stats(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match stats_inner(&state).await {
        Ok(body) => (StatusCode::OK, Json(body)),
        Err(err) => {
            warn!(error = %err, "stats query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string() })),
            )
        }
    }
}

async fn stats_inner(state: &AppState) -> Result<Value> {
    let table = load_table(state).await?;
    let stats = StatsAnalyzer::new().column_stats(&table);
    Ok(serde_json::to_value(stats)?)
}

pub async fn summary(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match summary_inner(&state).await {
        Ok(body) => (StatusCode::OK, Json(body)),
        Err(err) => {
            warn!(error = %err, "summary query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string() })),
            )
        }
    }
}

async fn summary_inner(state: &AppState) -> Result<Value> {
    let table = load_table(state).await?;
    let report = ComplianceAnalyzer::new().summarize(&table);
    Ok(serde_json::to_value(report)?)
}

pub async fn delete(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.store.delete() {
        Ok(existed) => {
            debug!(existed, "dataset deleted");
            (
                StatusCode::OK,
                Json(json!({ "success": true, "message": "Đã xóa toàn bộ dữ liệu" })),
            )
        }
        Err(err) => {
            error!(error = %err, "delete failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": format!("Lỗi khi xóa dữ liệu: {}", err),
                })),
            )
        }
    }
}
