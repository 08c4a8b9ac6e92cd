//! Remote store adapters.
//!
//! The remote store is the authoritative relational backend (`plan`,
//! `sessions`, `push_subscriptions`). It is the only thing in the crate that
//! crosses the process boundary; everything else works on the local store.

pub mod rest;
pub mod sqlite;

use crate::errors::{AppError, AppResult};
use crate::models::category::Category;
use crate::models::plan::{DEFAULT_CATEGORY_MINUTES, DEFAULT_DAILY_GOAL, PlanItem, WeeklyPlan};
use crate::models::session::{NewSession, SessionEntry, SessionPatch, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Contract every remote backend fulfils.
pub trait RemoteStore: Send + Sync {
    /// Rows of `user` with `from <= session_date <= to`, oldest first.
    fn fetch_sessions(&self, user: &UserId, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<SessionEntry>>;

    /// One row of `user` by id.
    fn fetch_session(&self, user: &UserId, id: i64) -> AppResult<Option<SessionEntry>>;

    /// Insert a batch in one request. Returns only the rows actually created,
    /// with their assigned ids; it may be shorter than `rows`.
    fn insert_sessions(&self, rows: &[NewSession]) -> AppResult<Vec<SessionEntry>>;

    fn update_session(&self, id: i64, patch: &SessionPatch) -> AppResult<()>;

    fn delete_session(&self, _id: i64) -> AppResult<()> {
        Err(AppError::Unsupported("delete_session"))
    }

    fn fetch_plan(&self, user: &UserId) -> AppResult<Option<PlanRow>>;

    fn insert_plan(&self, row: &PlanRow) -> AppResult<()>;

    fn upsert_plan(&self, row: &PlanRow) -> AppResult<()>;

    fn fetch_push_subscriptions(&self) -> AppResult<Vec<PushSubscription>>;
}

/// Wire shape of a `sessions` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRow {
    pub id: i64,
    pub user_id: String,
    pub session_date: String,
    pub category: Category,
    pub minutes: u32,
}

impl TryFrom<SessionRow> for SessionEntry {
    type Error = AppError;

    fn try_from(r: SessionRow) -> AppResult<Self> {
        let date = NaiveDate::parse_from_str(&r.session_date, "%Y-%m-%d")
            .map_err(|_| AppError::InvalidDate(r.session_date.clone()))?;
        Ok(SessionEntry::persisted(r.id, UserId(r.user_id), date, r.category, r.minutes))
    }
}

/// Wire shape of a row to insert into `sessions`.
#[derive(Debug, Clone, Serialize)]
pub struct NewSessionRow {
    pub user_id: String,
    pub session_date: String,
    pub category: Category,
    pub minutes: u32,
}

impl From<&NewSession> for NewSessionRow {
    fn from(n: &NewSession) -> Self {
        Self {
            user_id: n.user_id.as_str().to_string(),
            session_date: n.date.format("%Y-%m-%d").to_string(),
            category: n.category,
            minutes: n.minutes,
        }
    }
}

/// Wire shape of the `plan` row: one per user, one column pair per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRow {
    pub user_id: String,
    pub daily_goal: Option<u32>,
    pub scales_minutes: Option<u32>,
    pub scales_note: Option<String>,
    pub review_minutes: Option<u32>,
    pub review_note: Option<String>,
    pub new_minutes: Option<u32>,
    pub new_note: Option<String>,
    pub technique_minutes: Option<u32>,
    pub technique_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl PlanRow {
    pub fn from_plan(plan: &WeeklyPlan) -> Self {
        let m = |c: Category| Some(plan.item(c).minutes);
        let n = |c: Category| Some(plan.item(c).note.clone());
        Self {
            user_id: plan.user_id.as_str().to_string(),
            daily_goal: Some(plan.daily_goal_minutes),
            scales_minutes: m(Category::Scales),
            scales_note: n(Category::Scales),
            review_minutes: m(Category::Review),
            review_note: n(Category::Review),
            new_minutes: m(Category::New),
            new_note: n(Category::New),
            technique_minutes: m(Category::Technique),
            technique_note: n(Category::Technique),
            updated_at: plan.updated_at.clone(),
        }
    }

    /// Working plan; null columns fall back to the seed defaults
    /// (goal 180, 45 minutes, empty note).
    pub fn into_plan(self) -> WeeklyPlan {
        let item = |minutes: Option<u32>, note: Option<String>| PlanItem {
            minutes: minutes.unwrap_or(DEFAULT_CATEGORY_MINUTES),
            note: note.unwrap_or_default(),
        };
        WeeklyPlan {
            user_id: UserId(self.user_id),
            daily_goal_minutes: self.daily_goal.unwrap_or(DEFAULT_DAILY_GOAL),
            items: [
                item(self.scales_minutes, self.scales_note),
                item(self.review_minutes, self.review_note),
                item(self.new_minutes, self.new_note),
                item(self.technique_minutes, self.technique_note),
            ],
            updated_at: self.updated_at,
        }
    }
}

/// One row of `push_subscriptions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushSubscription {
    pub id: i64,
    pub user_id: Option<String>,
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
}
