use crate::cli::commands::{AppContext, parse_category};
use crate::config::Config;
use crate::core::autosave::AutoSaver;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use crate::utils::date;
use std::io::{self, BufRead};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Feed running-timer values into the auto-save queue.
///
/// Each line is `<category> <minutes>`; blank lines are skipped. Values are
/// coalesced per category and written after `autosave_debounce_ms`, and
/// whatever is still pending at end of input is flushed.
pub fn handle(cfg: &Config) -> AppResult<()> {
    let ctx = AppContext::open(cfg)?;
    let today = date::today();

    // Auto-save only patches existing rows.
    ctx.reconciler.ensure_daily_entries(today);

    let saver = AutoSaver::new(
        Arc::clone(&ctx.repo),
        Duration::from_millis(cfg.autosave_debounce_ms),
    );

    let mut written = 0;
    for line in io::stdin().lock().lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        let (Some(code), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };

        let category = parse_category(code)?;
        let minutes: u32 = value
            .parse()
            .map_err(|_| AppError::Other(format!("invalid minutes: {value}")))?;

        let now = Instant::now();
        saver.record(category, minutes, now);
        written += saver.flush_due(today, now)?;
    }
    written += saver.flush_all(today)?;

    success(format!("Auto-saved {} update(s) for {}", written, today));
    Ok(())
}
