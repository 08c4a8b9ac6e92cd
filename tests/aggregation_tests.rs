mod common;

use common::{day, user};
use practicelog::core::calculator::range::{capped_percentage, meets_goal, met_threshold};
use practicelog::core::calculator::{HistoryRange, day_summary, summarize, today_progress};
use practicelog::errors::AppError;
use practicelog::models::category::Category;
use practicelog::models::plan::WeeklyPlan;
use practicelog::models::session::SessionEntry;

fn entry(id: i64, date: &str, category: Category, minutes: u32) -> SessionEntry {
    SessionEntry::persisted(id, user(), day(date), category, minutes)
}

#[test]
fn day_split_sums_to_total() {
    let entries = vec![
        entry(1, "2026-10-12", Category::Scales, 10),
        entry(2, "2026-10-12", Category::Review, 20),
        entry(3, "2026-10-12", Category::New, 0),
        entry(4, "2026-10-13", Category::Scales, 99),
    ];

    let s = day_summary(&entries, day("2026-10-12"));
    assert_eq!(s.total, 30);
    assert!(s.has_entries);
    assert_eq!(s.split.get(Category::Scales), 10);
    assert_eq!(s.split.get(Category::Review), 20);
    assert_eq!(s.split.get(Category::Technique), 0);
    assert_eq!(
        s.segments(),
        vec![(Category::Scales, 10), (Category::Review, 20)]
    );
}

#[test]
fn empty_day_has_no_segments() {
    let s = day_summary(&[], day("2026-10-12"));
    assert_eq!(s.total, 0);
    assert!(!s.has_entries);
    assert!(s.segments().is_empty());
}

#[test]
fn threshold_is_eighty_percent_rounded() {
    assert_eq!(met_threshold(180), 144);
    assert_eq!(met_threshold(10), 8);
    // 0.8 * 11 = 8.8
    assert_eq!(met_threshold(11), 9);
    assert_eq!(met_threshold(0), 0);
}

#[test]
fn goal_is_met_from_the_threshold_up() {
    let d = "2026-10-12";
    let at = day_summary(&[entry(1, d, Category::Scales, 144)], day(d));
    let below = day_summary(&[entry(1, d, Category::Scales, 143)], day(d));
    let empty = day_summary(&[], day(d));

    assert!(meets_goal(&at, 180));
    assert!(!meets_goal(&below, 180));
    // An empty day never counts, not even against a zero goal.
    assert!(!meets_goal(&empty, 0));
}

#[test]
fn percentage_is_rounded_and_capped() {
    // 800 / (180 * 7) = 63.49%
    assert_eq!(capped_percentage(800, 180, 7), 63);
    assert_eq!(capped_percentage(5000, 180, 7), 100);
    assert_eq!(capped_percentage(0, 180, 7), 0);
    // Zero goal: denominator clamps to 1.
    assert_eq!(capped_percentage(1, 0, 7), 100);
    assert_eq!(capped_percentage(0, 0, 7), 0);
}

#[test]
fn week_summary_reports_consistency_and_progress() {
    let today = "2026-10-19";
    let entries = vec![
        entry(1, "2026-10-19", Category::Scales, 100),
        entry(2, "2026-10-19", Category::Review, 50),
        entry(3, "2026-10-17", Category::Technique, 144),
        entry(4, "2026-10-15", Category::New, 60),
        entry(5, "2026-10-10", Category::New, 500),
    ];

    let s = summarize(&entries, HistoryRange::Week, 180, day(today));
    assert_eq!(s.days.len(), 7);
    assert_eq!(s.days_in_range, 7);
    assert_eq!(s.days[0].date, day("2026-10-13"));
    assert_eq!(s.days[6].date, day(today));

    // The 2026-10-10 entry is outside the window.
    assert_eq!(s.total, 354);
    assert_eq!(s.met_days, 2);
    assert_eq!(s.consistency_display(), "2/7");
    // 354 / 1260 = 28.1%
    assert_eq!(s.pct, 28);
}

#[test]
fn ranges_parse_from_codes() {
    assert_eq!(HistoryRange::from_code("week").unwrap(), HistoryRange::Week);
    assert_eq!(HistoryRange::from_code("M").unwrap(), HistoryRange::Month);
    assert_eq!(HistoryRange::from_code("quarter").unwrap().days(), 90);
    assert_eq!(HistoryRange::from_code("y").unwrap().days(), 365);
    assert!(matches!(
        HistoryRange::from_code("decade"),
        Err(AppError::InvalidRange(_))
    ));
}

#[test]
fn today_progress_pairs_minutes_with_targets() {
    let mut plan = WeeklyPlan::seeded(user());
    plan.item_mut(Category::New).minutes = 60;

    let entries = vec![
        entry(1, "2026-10-19", Category::New, 25),
        entry(2, "2026-10-18", Category::New, 90),
    ];
    let p = today_progress(&entries, &plan, day("2026-10-19"));

    assert_eq!(p.total, 25);
    assert_eq!(p.goal, 180);
    assert_eq!(p.minutes.get(Category::New), 25);
    assert_eq!(p.targets.get(Category::New), 60);
    assert_eq!(p.targets.get(Category::Scales), 45);
}
