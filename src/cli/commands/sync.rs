use crate::cli::commands::AppContext;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::date;

pub fn handle(cfg: &Config) -> AppResult<()> {
    let ctx = AppContext::open(cfg)?;
    let plan = ctx.repo.bootstrap(date::today())?;
    let cached = ctx.repo.sessions()?.len();

    success(format!(
        "Synced {} entries for {} (daily goal {} min)",
        cached,
        ctx.repo.user(),
        plan.daily_goal_minutes
    ));
    Ok(())
}
