//! Quantities the report summarises, including the derived active totals.

use crate::quality::{TOTAL_ACTIVE_DISTANCE_COLUMN, TOTAL_ACTIVE_MINUTES_COLUMN};
use crate::record::{ActivityRecord, Metric};

/// A quantity the report summarises: a source column or a derived total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Column(Metric),
    TotalActiveDistance,
    TotalActiveMinutes,
}

impl Measure {
    /// Measures included in every report.
    pub const REPORTED: [Measure; 7] = [
        Measure::Column(Metric::TotalSteps),
        Measure::Column(Metric::TotalDistance),
        Measure::Column(Metric::Calories),
        Measure::Column(Metric::SedentaryMinutes),
        Measure::Column(Metric::VeryActiveMinutes),
        Measure::TotalActiveDistance,
        Measure::TotalActiveMinutes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Measure::Column(metric) => metric.column(),
            Measure::TotalActiveDistance => TOTAL_ACTIVE_DISTANCE_COLUMN,
            Measure::TotalActiveMinutes => TOTAL_ACTIVE_MINUTES_COLUMN,
        }
    }

    pub fn value(self, record: &ActivityRecord) -> Option<f64> {
        match self {
            Measure::Column(metric) => record.value(metric),
            Measure::TotalActiveDistance => record.total_active_distance(),
            Measure::TotalActiveMinutes => record.total_active_minutes(),
        }
    }

    /// Present values of this measure, in record order.
    pub fn values(self, records: &[ActivityRecord]) -> Vec<f64> {
        records.iter().filter_map(|r| self.value(r)).collect()
    }
}
