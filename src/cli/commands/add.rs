use crate::cli::commands::{AppContext, parse_category, parse_date_arg};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{alert, success};

/// Explicit save: a failure is shown as a blocking alert and returned.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add {
        category,
        minutes,
        date,
    } = cmd
    {
        let c = parse_category(category)?;
        let d = parse_date_arg(date.as_deref())?;

        let ctx = AppContext::open(cfg)?;
        match ctx.repo.save_entries(&[(d, c, *minutes)]) {
            Ok(saved) => {
                for e in saved {
                    success(format!(
                        "Saved {} min of {} on {} (#{})",
                        e.minutes,
                        e.category.label(),
                        e.date,
                        e.id.unwrap_or_default()
                    ));
                }
            }
            Err(e) => {
                alert(&e);
                return Err(e);
            }
        }
    }
    Ok(())
}
