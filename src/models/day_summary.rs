use super::category::{Category, PerCategory};
use chrono::NaiveDate;
use serde::Serialize;

/// Totals of one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub total: u32,
    pub split: PerCategory<u32>,
    pub has_entries: bool,
}

impl DaySummary {
    /// Non-zero slices of the split, in category order.
    pub fn segments(&self) -> Vec<(Category, u32)> {
        self.split.iter().filter(|(_, m)| *m > 0).collect()
    }
}

/// Aggregate over a trailing range of days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeSummary {
    pub days: Vec<DaySummary>,
    pub total: u64,
    pub goal: u32,
    pub met_days: usize,
    pub days_in_range: usize,
    pub pct: u32,
}

impl RangeSummary {
    pub fn consistency_display(&self) -> String {
        format!("{}/{}", self.met_days, self.days_in_range)
    }
}

/// Today's minutes against the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodayProgress {
    pub date: NaiveDate,
    pub minutes: PerCategory<u32>,
    pub targets: PerCategory<u32>,
    pub total: u32,
    pub goal: u32,
}
