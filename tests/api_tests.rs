use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use emissions_monitor::server::{router, AppState};
use emissions_monitor::store::{DatasetStore, MemoryStore};

const LEVEL_1: &str = "C%E1%BA%A5p%201"; // "Cấp 1"

/// Workbook with two leading banner rows before the header, mirroring the
/// real export layout.
fn sample_workbook() -> Vec<u8> {
    workbook_from_rows(&[
        ("01/01/2024", 1000.0, 200.0),
        ("05/01/2024", 100.0, 100.0),
    ])
}

fn workbook_from_rows(rows: &[(&str, f64, f64)]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .write_string(0, 0, "Trạm quan trắc khí thải")
        .unwrap();
    worksheet.write_string(2, 0, "Thời gian").unwrap();
    worksheet.write_string(2, 1, "CO((mg/Nm3))").unwrap();
    worksheet.write_string(2, 2, "SO2_1((mg/Nm3))").unwrap();
    for (i, (time, co, so2)) in rows.iter().enumerate() {
        let r = 3 + i as u32;
        worksheet.write_string(r, 0, *time).unwrap();
        worksheet.write_number(r, 1, *co).unwrap();
        worksheet.write_number(r, 2, *so2).unwrap();
    }
    workbook.save_to_buffer().unwrap()
}

fn app_with(dataset: Option<Vec<u8>>) -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(match dataset {
        Some(bytes) => MemoryStore::with_dataset(bytes),
        None => MemoryStore::new(),
    });
    let state = AppState::new(store.clone());
    (router(state, PathBuf::from("static")), store)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_upload(app: &Router, filename: &str, payload: &[u8]) -> (StatusCode, Value) {
    let boundary = "EMISSIONS-TEST-BOUNDARY";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(payload);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/upload")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_upload_then_query() {
    let (app, _store) = app_with(None);

    let (status, body) = post_upload(&app, "readings.xlsx", &sample_workbook()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, body) = get_json(&app, "/api/data").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], json!(2));
    assert_eq!(body["page"], json!(1));
    assert_eq!(body["page_size"], json!(20));
    assert_eq!(body["total_pages"], json!(1));
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][0]["CO((mg/Nm3))"], json!(1000.0));
}

#[tokio::test]
async fn test_level_filter_scenario() {
    // CO limit 900: 1000/900 ~ 1.11 is a level-1 exceedance, 100/900 is not
    let (app, _store) = app_with(Some(sample_workbook()));

    let uri = format!("/api/data?metric=CO((mg/Nm3))&level={LEVEL_1}");
    let (status, body) = get_json(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], json!(1));
    assert_eq!(body["data"][0]["CO((mg/Nm3))"], json!(1000.0));
}

#[tokio::test]
async fn test_data_is_idempotent() {
    let (app, _store) = app_with(Some(sample_workbook()));

    let uri = "/api/data?from_time=2024-01-01&to_time=2024-01-31";
    let first = get_json(&app, uri).await;
    let second = get_json(&app, uri).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_date_range_filters_inclusively() {
    let (app, _store) = app_with(Some(sample_workbook()));

    // ISO form is normalized to day-first before comparison
    let (_, body) = get_json(&app, "/api/data?from_time=2024-01-05").await;
    assert_eq!(body["total"], json!(1));
    assert_eq!(body["data"][0]["CO((mg/Nm3))"], json!(100.0));

    let (_, body) = get_json(&app, "/api/data?to_time=01/01/2024").await;
    assert_eq!(body["total"], json!(1));
    assert_eq!(body["data"][0]["CO((mg/Nm3))"], json!(1000.0));
}

#[tokio::test]
async fn test_pagination_reconstructs_table() {
    let rows: Vec<(String, f64, f64)> = (0..45)
        .map(|i| ("01/01/2024".to_string(), i as f64, 50.0))
        .collect();
    let borrowed: Vec<(&str, f64, f64)> =
        rows.iter().map(|(t, co, so2)| (t.as_str(), *co, *so2)).collect();
    let (app, _store) = app_with(Some(workbook_from_rows(&borrowed)));

    let (_, first) = get_json(&app, "/api/data?page=1&page_size=10").await;
    assert_eq!(first["total"], json!(45));
    assert_eq!(first["total_pages"], json!(5));

    let mut seen = Vec::new();
    for page in 1..=5 {
        let (_, body) = get_json(&app, &format!("/api/data?page={page}&page_size=10")).await;
        for row in body["data"].as_array().unwrap() {
            seen.push(row["CO((mg/Nm3))"].as_f64().unwrap());
        }
    }
    let expected: Vec<f64> = (0..45).map(|i| i as f64).collect();
    assert_eq!(seen, expected);

    // Out-of-range pages are empty, not an error
    let (status, body) = get_json(&app, "/api/data?page=6&page_size=10").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_dataset_yields_empty_shapes() {
    let (app, _store) = app_with(None);

    let (status, body) = get_json(&app, "/api/data").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "data": [], "total": 0, "page": 1, "total_pages": 0 })
    );

    let (status, body) = get_json(&app, "/api/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));

    let (status, body) = get_json(&app, "/api/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "total": 0, "summary": {} }));
}

#[tokio::test]
async fn test_delete_then_query() {
    let (app, store) = app_with(Some(sample_workbook()));

    let (status, body) = post_json(&app, "/api/delete").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert!(body["message"].is_string());
    assert_eq!(store.fetch().unwrap(), None);

    let (_, body) = get_json(&app, "/api/data").await;
    assert_eq!(body["total"], json!(0));
}

#[tokio::test]
async fn test_upload_rejects_wrong_extension() {
    let dataset = sample_workbook();
    let (app, store) = app_with(Some(dataset.clone()));

    let (status, body) = post_upload(&app, "data.txt", b"not a spreadsheet").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("File must be .xlsx or .xls"));

    // Stored dataset is unchanged
    assert_eq!(store.fetch().unwrap(), Some(dataset));
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let (app, _store) = app_with(None);

    let boundary = "EMISSIONS-TEST-BOUNDARY";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nvalue\r\n--{boundary}--\r\n"
    );
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/upload")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], json!("No file part"));
}

#[tokio::test]
async fn test_stats_shape() {
    let (app, _store) = app_with(Some(sample_workbook()));

    let (status, body) = get_json(&app, "/api/stats").await;
    assert_eq!(status, StatusCode::OK);

    let co = &body["CO((mg/Nm3))"];
    assert_eq!(co["min"], json!(100.0));
    assert_eq!(co["max"], json!(1000.0));
    assert_eq!(co["avg"], json!(550.0));
    assert!(body.get("Thời gian").is_none());
}

#[tokio::test]
async fn test_summary_counts_and_gap() {
    // 100 -> Đạt QC, 1000 -> Cấp 1, 900 -> exactly the ceiling (no band)
    let rows = [
        ("01/01/2024", 100.0, 50.0),
        ("02/01/2024", 1000.0, 50.0),
        ("03/01/2024", 900.0, 50.0),
    ];
    let (app, _store) = app_with(Some(workbook_from_rows(&rows)));

    let (status, body) = get_json(&app, "/api/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], json!(3));

    let co = &body["summary"]["CO((mg/Nm3))"];
    assert_eq!(co["qc"], json!(900.0));
    assert_eq!(co["levels"]["Đạt QC"]["count"], json!(1));
    assert_eq!(co["levels"]["Cấp 1"]["count"], json!(1));
    assert_eq!(co["levels"]["Cấp 4"]["count"], json!(0));
    assert_eq!(co["levels"]["Đạt QC"]["percent"], json!(33.3));

    let percent_sum: f64 = co["levels"]
        .as_object()
        .unwrap()
        .values()
        .map(|l| l["percent"].as_f64().unwrap())
        .sum();
    assert!(percent_sum <= 100.0);

    // All SO2 readings are compliant
    let so2 = &body["summary"]["SO2_1((mg/Nm3))"];
    assert_eq!(so2["levels"]["Đạt QC"]["count"], json!(3));
    assert_eq!(so2["levels"]["Đạt QC"]["percent"], json!(100.0));
}

#[tokio::test]
async fn test_bad_arguments_use_caught_error_contract() {
    let (app, _store) = app_with(Some(sample_workbook()));

    let (status, body) = get_json(&app, "/api/data?from_time=garbage").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["total"], json!(0));
    assert!(body["error"].is_string());

    let (status, body) = get_json(&app, "/api/data?value_min=abc&metric=CO((mg/Nm3))").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());

    let (status, body) = get_json(&app, "/api/data?page_size=0").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_corrupt_dataset_is_caught_everywhere() {
    let (app, _store) = app_with(Some(b"definitely not a workbook".to_vec()));

    let (status, body) = get_json(&app, "/api/data").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());

    let (status, body) = get_json(&app, "/api/stats").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());

    let (status, body) = get_json(&app, "/api/summary").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_static_pages() {
    let static_dir = TempDir::new().unwrap();
    std::fs::write(static_dir.path().join("index.html"), "<h1>Trang chủ</h1>").unwrap();
    std::fs::write(static_dir.path().join("test_delete.html"), "<h1>Test</h1>").unwrap();
    std::fs::write(static_dir.path().join("app.js"), "console.log('ok');").unwrap();

    let state = AppState::new(Arc::new(MemoryStore::new()));
    let app = router(state, static_dir.path().to_path_buf());

    for (uri, needle) in [
        ("/", "Trang chủ"),
        ("/test", "Test"),
        ("/app.js", "console.log"),
    ] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "uri {uri}");
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains(needle), "uri {uri}");
    }
}
