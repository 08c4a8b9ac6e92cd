use crate::cli::commands::open_local;
use crate::config::Config;
use crate::db::log::load_log;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};

/// Print the internal `log` table, newest first.
pub fn handle(cfg: &Config) -> AppResult<()> {
    let pool = open_local(cfg)?;
    let rows = load_log(&pool.conn)?;

    if rows.is_empty() {
        info("Internal log is empty.");
        return Ok(());
    }

    header("Internal log");
    for (date, op, target, msg) in rows {
        println!("{:<32} {:<18} {:<24} {}", date, op, target, msg);
    }
    Ok(())
}
