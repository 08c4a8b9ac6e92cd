use crate::cli::commands::open_remote;
use crate::config::Config;
use crate::core::notify::{LogSender, ReminderPayload, dispatch_reminders};
use crate::errors::AppResult;

/// Weekly reminder run. Needs no signed-in user; output is JSON.
pub fn handle(cfg: &Config) -> AppResult<()> {
    let remote = open_remote(cfg)?;
    let report = dispatch_reminders(remote.as_ref(), &LogSender, &ReminderPayload::default())?;
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}
