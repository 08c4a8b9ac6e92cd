use crate::cli::commands::AppContext;
use crate::config::Config;
use crate::core::auth::{AuthSession, ConfiguredSession};
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cfg: &Config) -> AppResult<()> {
    let ctx = AppContext::open(cfg)?;
    let user = ctx.repo.user().clone();
    ConfiguredSession::new(Some(user.as_str()))
        .attach(ctx.repo)
        .sign_out()?;
    success(format!("Local data of {} removed", user));
    Ok(())
}
