use crate::cli::commands::AppContext;
use crate::config::Config;
use crate::core::calculator::today_progress;
use crate::errors::AppResult;
use crate::models::category::Category;
use crate::ui::messages::header;
use crate::utils::colors::{RESET, color_for_progress};
use crate::utils::date;
use crate::utils::formatting::pad_right;

pub fn handle(cfg: &Config) -> AppResult<()> {
    let ctx = AppContext::open(cfg)?;
    let today = date::today();

    // Best effort: missing rows are created lazily on the first save anyway.
    ctx.reconciler.ensure_daily_entries(today);

    let plan = ctx.plan()?;
    let progress = today_progress(&ctx.repo.sessions_on(today)?, &plan, today);

    header(format!("Today {}", today));
    for c in Category::ALL {
        let done = progress.minutes.get(c);
        let target = progress.targets.get(c);
        println!(
            "{} {}{:>4}{} / {:>4} min",
            pad_right(c.label(), 12),
            color_for_progress(done, target),
            done,
            RESET,
            target
        );
    }
    println!(
        "{} {}{:>4}{} / {:>4} min",
        pad_right("Total", 12),
        color_for_progress(progress.total, progress.goal),
        progress.total,
        RESET,
        progress.goal
    );
    Ok(())
}
