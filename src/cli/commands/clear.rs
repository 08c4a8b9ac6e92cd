use crate::cli::commands::{AppContext, parse_category};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use crate::utils::date;

/// Clearing sets minutes to 0; entries are never hard-deleted.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Clear {
        date: date_str,
        category,
    } = cmd
    {
        let d = date::parse_date(date_str).ok_or_else(|| AppError::InvalidDate(date_str.into()))?;
        let ctx = AppContext::open(cfg)?;

        match category {
            Some(code) => {
                let c = parse_category(code)?;
                ctx.repo.pull_day(d)?;
                let entry = ctx
                    .repo
                    .sessions_on(d)?
                    .into_iter()
                    .find(|e| e.category == c && e.id.is_some());
                match entry.and_then(|e| e.id) {
                    Some(id) => {
                        ctx.repo.clear_entry(id)?;
                        success(format!("Cleared {} on {}", c.label(), d));
                    }
                    None => info(format!("No {} entry on {}", c.label(), d)),
                }
            }
            None => {
                let n = ctx.repo.clear_day(d)?;
                success(format!("Cleared {} entries on {}", n, d));
            }
        }
    }
    Ok(())
}
