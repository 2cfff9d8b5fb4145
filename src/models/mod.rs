pub mod reading;
pub mod severity;

pub use reading::{DataTable, Reading};
pub use severity::SeverityLevel;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    CarbonMonoxide,
    SulphurDioxide,
    NitrogenOxides,
    Oxygen,
    FlowRate,
    Temperature,
    Dust,
    Pressure,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::CarbonMonoxide,
        Metric::SulphurDioxide,
        Metric::NitrogenOxides,
        Metric::Oxygen,
        Metric::FlowRate,
        Metric::Temperature,
        Metric::Dust,
        Metric::Pressure,
    ];

    /// Verbatim spreadsheet column label for this metric.
    pub fn column_label(&self) -> &'static str {
        match self {
            Metric::CarbonMonoxide => "CO((mg/Nm3))",
            Metric::SulphurDioxide => "SO2_1((mg/Nm3))",
            Metric::NitrogenOxides => "NOX_1((mg/Nm3))",
            Metric::Oxygen => "O2_1(%)",
            Metric::FlowRate => "Q_1(m3/h)",
            Metric::Temperature => "Temp_1((oC))",
            Metric::Dust => "Dust_1((mg/Nm3))",
            Metric::Pressure => "Pkq",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Metric::ALL
            .iter()
            .copied()
            .find(|metric| metric.column_label() == label)
    }

    /// Regulatory ceiling (qc). Pressure has no defined ceiling and is never
    /// classified or filtered by severity level.
    pub fn limit(&self) -> Option<f64> {
        match self {
            Metric::CarbonMonoxide => Some(900.0),
            Metric::SulphurDioxide => Some(450.0),
            Metric::NitrogenOxides => Some(765.0),
            Metric::Oxygen => Some(21.0),
            Metric::FlowRate => Some(9_999_999_999.0),
            Metric::Temperature => Some(200.0),
            Metric::Dust => Some(180.0),
            Metric::Pressure => None,
        }
    }

    pub fn is_regulated(&self) -> bool {
        self.limit().is_some()
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Metric::CarbonMonoxide => "Carbon monoxide",
            Metric::SulphurDioxide => "Sulphur dioxide",
            Metric::NitrogenOxides => "Nitrogen oxides",
            Metric::Oxygen => "Oxygen",
            Metric::FlowRate => "Flow rate",
            Metric::Temperature => "Temperature",
            Metric::Dust => "Dust",
            Metric::Pressure => "Pressure",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
