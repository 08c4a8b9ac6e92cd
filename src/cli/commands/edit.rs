use crate::cli::commands::{AppContext, parse_category};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::session::SessionPatch;
use crate::ui::messages::{alert, info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Edit {
        id,
        category,
        minutes,
    } = cmd
    {
        let patch = SessionPatch {
            category: category.as_deref().map(parse_category).transpose()?,
            minutes: *minutes,
        };
        if patch.is_empty() {
            info("Nothing to change: pass --category and/or --minutes.");
            return Ok(());
        }

        let ctx = AppContext::open(cfg)?;
        match ctx.repo.update_entry(*id, patch) {
            Ok(e) => success(format!(
                "Entry #{} on {}: {} {} min",
                id,
                e.date,
                e.category.label(),
                e.minutes
            )),
            Err(e) => {
                alert(&e);
                return Err(e);
            }
        }
    }
    Ok(())
}
