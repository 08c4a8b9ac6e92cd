use crate::cli::commands::AppContext;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::{HistoryRange, summarize};
use crate::errors::AppResult;
use crate::ui::messages::header;
use crate::utils::colors::{GREY, RESET};
use crate::utils::date;
use crate::utils::formatting::mins2readable;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::History { range } = cmd {
        let range = HistoryRange::from_code(range)?;
        let ctx = AppContext::open(cfg)?;
        let today = date::today();

        let from = today - chrono::Duration::days(i64::from(range.days()) - 1);
        if let Err(e) = ctx.repo.pull(from, today) {
            tracing::warn!(error = %e, "history refresh failed, showing cached entries");
        }

        let goal = ctx.plan()?.daily_goal_minutes;
        let summary = summarize(&ctx.repo.sessions()?, range, goal, today);

        header(format!("History: last {} days", range.days()));
        for day in &summary.days {
            let segments = day
                .segments()
                .iter()
                .map(|(c, m)| format!("{} {}m", c.label(), m))
                .collect::<Vec<_>>()
                .join(", ");
            if day.total == 0 {
                println!("{}  {}{:>4} min{}", day.date, GREY, 0, RESET);
            } else {
                println!("{}  {:>4} min  {}", day.date, day.total, segments);
            }
        }

        println!();
        println!("Total: {} ({} min)", mins2readable(summary.total, false), summary.total);
        println!("Consistency: {}", summary.consistency_display());
        println!("Progress: {}%", summary.pct);
    }
    Ok(())
}
