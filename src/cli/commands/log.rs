use crate::cli::commands::AppContext;
use crate::config::Config;
use crate::core::calculator::day_summary;
use crate::core::reconciler::ReconcileOutcome;
use crate::errors::AppResult;
use crate::ui::messages::{header, warning};
use crate::utils::colors::{GREY, RESET};
use crate::utils::date;
use crate::utils::formatting::{mins2readable, pad_right};

/// Print the trailing window, newest day first, one line per entry.
pub fn handle(cfg: &Config) -> AppResult<()> {
    let ctx = AppContext::open(cfg)?;
    let today = date::today();

    let failed = ctx
        .reconciler
        .ensure_all_days_have_entries(today)
        .into_iter()
        .filter(|(_, o)| *o == ReconcileOutcome::Failed)
        .count();
    if failed > 0 {
        warning(format!("{} day(s) could not be completed from the remote store", failed));
    }

    let from = today - chrono::Duration::days(i64::from(cfg.log_window_days.max(1)) - 1);
    let entries: Vec<_> = ctx
        .repo
        .sessions()?
        .into_iter()
        .filter(|e| e.date >= from && e.date <= today)
        .collect();

    header(format!("Session log {} → {}", from, today));
    for d in date::last_n_dates(today, cfg.log_window_days.max(1)) {
        let summary = day_summary(&entries, d);
        println!("\n📅 {}  ({})", d, mins2readable(u64::from(summary.total), false));

        let mut any = false;
        for e in entries.iter().filter(|e| e.date == d) {
            any = true;
            let id = e
                .id
                .map(|i| format!("#{}", i))
                .unwrap_or_else(|| "pending".to_string());
            let color = if e.minutes == 0 { GREY } else { RESET };
            println!(
                "  {:>8}  {}{}{:>4} min{}",
                id,
                color,
                pad_right(e.category.label(), 12),
                e.minutes,
                RESET
            );
        }
        if !any {
            println!("  {}(no entries){}", GREY, RESET);
        }
    }
    Ok(())
}
