use crate::cli::commands::{AppContext, open_local};
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::date;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped in test mode)
///  - the local store and all pending migrations
///  - the user's plan (seeded if missing) and recent history, when a user is known
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    cfg.init_all(cli.test)?;

    println!("⚙️  Initializing practicelog…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Local store : {}", &cfg.database);

    let pool = open_local(cfg)?;
    success(format!("Local store initialized at {}", &cfg.database));

    log::ttlog_quiet(
        &pool.conn,
        "init",
        &cfg.database,
        &format!("Local store initialized at {}", &cfg.database),
    );
    drop(pool);

    if cfg.user.is_none() {
        info("No user configured yet: pass --user or set `user` in the config file.");
        return Ok(());
    }

    let ctx = AppContext::open(cfg)?;
    let plan = ctx.repo.bootstrap(date::today())?;
    success(format!(
        "Signed in as {} (daily goal {} min)",
        ctx.repo.user(),
        plan.daily_goal_minutes
    ));
    Ok(())
}
