use super::daily::day_summary;
use super::div_round;
use crate::errors::{AppError, AppResult};
use crate::models::day_summary::{DaySummary, RangeSummary};
use crate::models::session::SessionEntry;
use crate::utils::date;
use chrono::NaiveDate;

/// History windows offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryRange {
    Week,
    Month,
    Quarter,
    Year,
}

impl HistoryRange {
    pub fn days(&self) -> u32 {
        match self {
            HistoryRange::Week => 7,
            HistoryRange::Month => 30,
            HistoryRange::Quarter => 90,
            HistoryRange::Year => 365,
        }
    }

    pub fn from_code(code: &str) -> AppResult<Self> {
        match code.trim().to_lowercase().as_str() {
            "w" | "week" => Ok(HistoryRange::Week),
            "m" | "month" => Ok(HistoryRange::Month),
            "q" | "quarter" => Ok(HistoryRange::Quarter),
            "y" | "year" => Ok(HistoryRange::Year),
            other => Err(AppError::InvalidRange(other.to_string())),
        }
    }
}

/// 80% of the goal, rounded half up.
pub fn met_threshold(goal: u32) -> u64 {
    div_round(u64::from(goal) * 4, 5)
}

/// A day meets the goal when it logged something and reached 80% of it.
pub fn meets_goal(day: &DaySummary, goal: u32) -> bool {
    day.total > 0 && u64::from(day.total) >= met_threshold(goal)
}

/// `min(100, round(total / max(goal * days, 1) * 100))`
pub fn capped_percentage(total: u64, goal: u32, days: usize) -> u32 {
    let target = (u64::from(goal) * days as u64).max(1);
    div_round(total * 100, target).min(100) as u32
}

/// Per-day totals, running total, consistency and capped percentage for the
/// `range` days ending at `today` (oldest first).
pub fn summarize(entries: &[SessionEntry], range: HistoryRange, goal: u32, today: NaiveDate) -> RangeSummary {
    let days: Vec<DaySummary> = date::trailing_window(today, range.days())
        .into_iter()
        .map(|d| day_summary(entries, d))
        .collect();

    let total: u64 = days.iter().map(|d| u64::from(d.total)).sum();
    let met_days = days.iter().filter(|d| meets_goal(d, goal)).count();
    let days_in_range = days.len();

    RangeSummary {
        pct: capped_percentage(total, goal, days_in_range),
        days,
        total,
        goal,
        met_days,
        days_in_range,
    }
}
