use serde::{Deserialize, Serialize};

/// Severity bands for a measured value against its regulatory ceiling, in
/// ascending order of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeverityLevel {
    Compliant, // ratio < 1
    Level1,    // 1.1 <= ratio < 2
    Level2,    // 2 <= ratio < 5
    Level3,    // 5 <= ratio < 10
    Level4,    // ratio >= 10
}

impl SeverityLevel {
    pub const ALL: [SeverityLevel; 5] = [
        SeverityLevel::Compliant,
        SeverityLevel::Level1,
        SeverityLevel::Level2,
        SeverityLevel::Level3,
        SeverityLevel::Level4,
    ];

    /// Wire label used in query parameters and summary payloads.
    pub fn label(&self) -> &'static str {
        match self {
            SeverityLevel::Compliant => "Đạt QC",
            SeverityLevel::Level1 => "Cấp 1",
            SeverityLevel::Level2 => "Cấp 2",
            SeverityLevel::Level3 => "Cấp 3",
            SeverityLevel::Level4 => "Cấp 4",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Đạt QC" => Some(SeverityLevel::Compliant),
            "Cấp 1" => Some(SeverityLevel::Level1),
            "Cấp 2" => Some(SeverityLevel::Level2),
            "Cấp 3" => Some(SeverityLevel::Level3),
            "Cấp 4" => Some(SeverityLevel::Level4),
            _ => None,
        }
    }

    /// Classify a measured value against a regulatory ceiling.
    ///
    /// Ratios in `[1, 1.1)` fall into no band: a reading at exactly the
    /// ceiling is neither compliant (`< 1`) nor a level-1 exceedance
    /// (`>= 1.1`). Non-finite ratios (missing or garbage values) also
    /// classify as `None`.
    pub fn classify(value: f64, limit: f64) -> Option<Self> {
        let ratio = value / limit;
        if !ratio.is_finite() {
            return None;
        }

        if ratio < 1.0 {
            Some(SeverityLevel::Compliant)
        } else if (1.1..2.0).contains(&ratio) {
            Some(SeverityLevel::Level1)
        } else if (2.0..5.0).contains(&ratio) {
            Some(SeverityLevel::Level2)
        } else if (5.0..10.0).contains(&ratio) {
            Some(SeverityLevel::Level3)
        } else if ratio >= 10.0 {
            Some(SeverityLevel::Level4)
        } else {
            None // the [1, 1.1) gap
        }
    }
}

impl std::fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
