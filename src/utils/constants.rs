/// File names
pub const DATASET_FILE: &str = "SoLieuKhiThai.xlsx";
pub const INDEX_PAGE: &str = "index.html";
pub const TEST_PAGE: &str = "test_delete.html";

/// Primary time column label (matched verbatim against the header row)
pub const TIME_COLUMN: &str = "Thời gian";

/// Column labels that must all appear in a row for it to count as the header
pub const REQUIRED_COLUMNS: [&str; 3] = ["Thời gian", "CO((mg/Nm3))", "SO2_1((mg/Nm3))"];

/// Time formats (day-first)
pub const DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// A structurally valid time cell contains exactly this many '/' separators
pub const TIME_SEPARATOR_COUNT: usize = 2;

/// Pagination defaults
pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Server defaults
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Upload size cap
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024; // 50MB
