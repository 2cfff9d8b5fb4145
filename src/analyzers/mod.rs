pub mod column_stats;
pub mod compliance;

pub use column_stats::{ColumnStats, StatsAnalyzer};
pub use compliance::{ComplianceAnalyzer, LevelStat, MetricSummary, SummaryReport};
