use crate::models::category::PerCategory;
use crate::models::day_summary::{DaySummary, TodayProgress};
use crate::models::plan::WeeklyPlan;
use crate::models::session::SessionEntry;
use chrono::NaiveDate;

/// Total and per-category split of one day. The split always sums to the total.
pub fn day_summary(entries: &[SessionEntry], date: NaiveDate) -> DaySummary {
    let mut split: PerCategory<u32> = PerCategory::default();
    let mut has_entries = false;

    for e in entries.iter().filter(|e| e.date == date) {
        has_entries = true;
        split.set(e.category, split.get(e.category) + e.minutes);
    }

    DaySummary {
        date,
        total: split.0.iter().sum(),
        split,
        has_entries,
    }
}

/// Minutes logged on `today` next to the plan's targets.
pub fn today_progress(entries: &[SessionEntry], plan: &WeeklyPlan, today: NaiveDate) -> TodayProgress {
    let day = day_summary(entries, today);
    TodayProgress {
        date: today,
        minutes: day.split,
        targets: plan.targets(),
        total: day.total,
        goal: plan.daily_goal_minutes,
    }
}
