pub mod add;
pub mod audit;
pub mod clear;
pub mod config;
pub mod edit;
pub mod history;
pub mod init;
pub mod log;
pub mod notify;
pub mod plan;
pub mod signout;
pub mod sync;
pub mod today;
pub mod track;

use crate::config::{Config, RemoteConfig};
use crate::core::auth::{AuthSession, ConfiguredSession};
use crate::core::reconciler::Reconciler;
use crate::core::repository::Repository;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::category::Category;
use crate::models::plan::WeeklyPlan;
use crate::remote::RemoteStore;
use crate::remote::rest::RestRemote;
use crate::remote::sqlite::SqliteRemote;
use crate::utils::date;
use std::sync::Arc;

/// Local store with every migration applied.
pub fn open_local(cfg: &Config) -> AppResult<DbPool> {
    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;
    Ok(pool)
}

pub fn open_remote(cfg: &Config) -> AppResult<Arc<dyn RemoteStore>> {
    let remote: Arc<dyn RemoteStore> = match &cfg.remote {
        RemoteConfig::Sqlite { path } => Arc::new(SqliteRemote::open(path)?),
        RemoteConfig::Rest { url, api_key } => Arc::new(RestRemote::new(url, api_key)),
    };
    Ok(remote)
}

/// Everything a signed-in command needs.
pub struct AppContext {
    pub repo: Arc<Repository>,
    pub reconciler: Reconciler,
}

impl AppContext {
    pub fn open(cfg: &Config) -> AppResult<Self> {
        let user = ConfiguredSession::new(cfg.user.as_deref()).require_user()?;
        let repo = Arc::new(
            Repository::new(user, open_local(cfg)?, open_remote(cfg)?)
                .with_history_days(cfg.history_fetch_days),
        );
        let reconciler = Reconciler::new(Arc::clone(&repo)).with_window_days(cfg.log_window_days);
        Ok(Self { repo, reconciler })
    }

    /// Cached plan, or the remote one (seeded on first use).
    pub fn plan(&self) -> AppResult<WeeklyPlan> {
        match self.repo.plan()? {
            Some(p) => Ok(p),
            None => self.repo.load_or_seed_plan(date::today()),
        }
    }
}

pub fn parse_category(code: &str) -> AppResult<Category> {
    Category::from_code(code).ok_or_else(|| AppError::InvalidCategory(code.to_string()))
}

pub fn parse_date_arg(s: Option<&str>) -> AppResult<chrono::NaiveDate> {
    date::parse_or_today(s).map_err(AppError::InvalidDate)
}
