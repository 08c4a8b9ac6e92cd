//! Two-tier repository: the local store (SQLite cache) in front of a remote
//! store adapter.
//!
//! Reads are served from the local tier. Writes go optimistic-local →
//! remote → reconciled-local; the reconciled step is always a `merge` by
//! remote id. The local lock is never held across a remote call, so several
//! logical operations can be in flight at once and complete in any order.
//! Two patches racing on the same id: the later-resolving one wins.

use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::{plans, queries};
use crate::errors::{AppError, AppResult};
use crate::models::category::Category;
use crate::models::plan::WeeklyPlan;
use crate::models::session::{NewSession, SessionEntry, SessionPatch, UserId};
use crate::remote::{PlanRow, RemoteStore};
use chrono::{Local, NaiveDate};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// How far back `bootstrap` pulls sessions.
pub const DEFAULT_HISTORY_DAYS: u32 = 365;

pub struct Repository {
    user: UserId,
    local: Mutex<DbPool>,
    remote: Arc<dyn RemoteStore>,
    history_days: u32,
}

impl Repository {
    pub fn new(user: UserId, local: DbPool, remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            user,
            local: Mutex::new(local),
            remote,
            history_days: DEFAULT_HISTORY_DAYS,
        }
    }

    pub fn with_history_days(mut self, days: u32) -> Self {
        self.history_days = days.max(1);
        self
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn remote(&self) -> &dyn RemoteStore {
        self.remote.as_ref()
    }

    fn local(&self) -> AppResult<MutexGuard<'_, DbPool>> {
        self.local.lock().map_err(|_| AppError::LockPoisoned("local store"))
    }

    // ---------------------------------------------------------------
    // Reads (local tier)
    // ---------------------------------------------------------------

    pub fn sessions(&self) -> AppResult<Vec<SessionEntry>> {
        queries::load_for_user(&self.local()?.conn, &self.user)
    }

    pub fn sessions_on(&self, date: NaiveDate) -> AppResult<Vec<SessionEntry>> {
        queries::load_by_date(&self.local()?.conn, &self.user, &date)
    }

    pub fn local_categories_on(&self, date: NaiveDate) -> AppResult<BTreeSet<Category>> {
        Ok(self.sessions_on(date)?.into_iter().map(|e| e.category).collect())
    }

    pub fn plan(&self) -> AppResult<Option<WeeklyPlan>> {
        plans::load_plan(&self.local()?.conn, &self.user)
    }

    // ---------------------------------------------------------------
    // Remote tier + merge
    // ---------------------------------------------------------------

    /// Upsert rows acknowledged by the remote store into the local tier.
    pub fn merge(&self, rows: &[SessionEntry]) -> AppResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        queries::merge_persisted(&self.local()?.conn, rows)
    }

    /// Remote rows for one date, merged locally before being returned.
    pub fn pull_day(&self, date: NaiveDate) -> AppResult<Vec<SessionEntry>> {
        let rows = self.remote.fetch_sessions(&self.user, date, date)?;
        self.merge(&rows)?;
        Ok(rows)
    }

    /// Mirror [from, to] from the remote store.
    ///
    /// Fetched rows are merged; persisted local rows in the range that the
    /// remote no longer has are pruned. Placeholders survive.
    pub fn pull(&self, from: NaiveDate, to: NaiveDate) -> AppResult<usize> {
        let rows = self.remote.fetch_sessions(&self.user, from, to)?;
        let keep: Vec<i64> = rows.iter().filter_map(|r| r.id).collect();

        let pool = self.local()?;
        queries::merge_persisted(&pool.conn, &rows)?;
        let pruned = queries::prune_missing(&pool.conn, &self.user, &from, &to, &keep)?;
        if pruned > 0 {
            tracing::debug!(pruned, %from, %to, "pruned local rows missing remotely");
        }
        Ok(rows.len())
    }

    /// Batch-insert remotely, then merge exactly the rows reported as created.
    pub fn insert_remote(&self, rows: &[NewSession]) -> AppResult<Vec<SessionEntry>> {
        let created = self.remote.insert_sessions(rows)?;
        self.merge(&created)?;
        Ok(created)
    }

    // ---------------------------------------------------------------
    // Sign-in bootstrap
    // ---------------------------------------------------------------

    /// Load-or-seed the plan and mirror the recent history.
    pub fn bootstrap(&self, today: NaiveDate) -> AppResult<WeeklyPlan> {
        let plan = self.load_or_seed_plan(today)?;
        let from = today - chrono::Duration::days(i64::from(self.history_days));
        let fetched = self.pull(from, today)?;
        tracing::info!(user = %self.user, fetched, "local store refreshed");
        Ok(plan)
    }

    /// Remote plan, or the seeded defaults when the user has none yet.
    ///
    /// A seeded plan is inserted, fetched back and applied exactly as the
    /// remote stored it.
    pub fn load_or_seed_plan(&self, today: NaiveDate) -> AppResult<WeeklyPlan> {
        let row = match self.remote.fetch_plan(&self.user)? {
            Some(row) => row,
            None => {
                let seed = PlanRow::from_plan(&WeeklyPlan::seeded(self.user.clone()));
                self.remote.insert_plan(&seed)?;
                tracing::info!(user = %self.user, "seeded default plan");
                self.remote
                    .fetch_plan(&self.user)?
                    .ok_or_else(|| AppError::Remote("seeded plan not readable".into()))?
            }
        };

        let plan = row.into_plan();
        let pool = self.local()?;
        plans::save_plan(&pool.conn, &plan, today)?;
        Ok(plan)
    }

    pub fn save_plan(&self, plan: &WeeklyPlan, today: NaiveDate) -> AppResult<WeeklyPlan> {
        let mut plan = plan.clone();
        plan.user_id = self.user.clone();
        plan.updated_at = Some(Local::now().to_rfc3339());

        self.remote.upsert_plan(&PlanRow::from_plan(&plan))?;

        let pool = self.local()?;
        plans::save_plan(&pool.conn, &plan, today)?;
        ttlog_quiet(
            &pool.conn,
            "plan_save",
            self.user.as_str(),
            &format!("daily goal {} min", plan.daily_goal_minutes),
        );
        Ok(plan)
    }

    // ---------------------------------------------------------------
    // Entry writes
    // ---------------------------------------------------------------

    /// Explicit save of (date, category, minutes) rows.
    ///
    /// The affected dates are refreshed from the remote first, so a slot
    /// that already exists there is patched, never inserted twice. The rest
    /// are written as placeholders, inserted remotely in one batch and
    /// replaced by the created rows. If the insert fails, or creates fewer
    /// rows than requested, the missing placeholders are rolled back and an
    /// error is returned.
    pub fn save_entries(&self, rows: &[(NaiveDate, Category, u32)]) -> AppResult<Vec<SessionEntry>> {
        let rows: Vec<_> = rows.iter().copied().filter(|(_, _, m)| *m > 0).collect();
        if rows.is_empty() {
            return Err(AppError::NothingToSave);
        }

        let dates: BTreeSet<NaiveDate> = rows.iter().map(|(d, _, _)| *d).collect();
        for date in dates {
            self.pull_day(date)?;
        }

        let mut saved = Vec::new();
        let mut placeholders = Vec::new();

        for (date, category, minutes) in rows {
            let existing = self
                .sessions_on(date)?
                .into_iter()
                .find(|e| e.category == category && e.id.is_some());

            match existing {
                Some(mut entry) => {
                    let id = entry.id.ok_or(AppError::Other("persisted entry without id".into()))?;
                    self.update_entry(id, SessionPatch::minutes(minutes))?;
                    entry.minutes = minutes;
                    saved.push(entry);
                }
                None => {
                    let ph = SessionEntry::placeholder(self.user.clone(), date, category, minutes);
                    queries::upsert_entry(&self.local()?.conn, &ph)?;
                    placeholders.push(ph);
                }
            }
        }

        if !placeholders.is_empty() {
            let new_rows: Vec<NewSession> = placeholders
                .iter()
                .map(|p| NewSession {
                    user_id: p.user_id.clone(),
                    date: p.date,
                    category: p.category,
                    minutes: p.minutes,
                })
                .collect();

            let created = match self.remote.insert_sessions(&new_rows) {
                Ok(created) => created,
                Err(e) => {
                    self.discard(&placeholders);
                    return Err(e);
                }
            };

            self.merge(&created)?;
            // Placeholders with no created counterpart never reached the remote.
            let requested = placeholders.len();
            let leftover: Vec<SessionEntry> = placeholders
                .into_iter()
                .filter(|p| !created.iter().any(|c| c.date == p.date && c.category == p.category))
                .collect();
            if !leftover.is_empty() {
                tracing::warn!(count = leftover.len(), "remote created fewer rows than saved");
                self.discard(&leftover);
                return Err(AppError::Remote(format!(
                    "{} of {} entries were not created",
                    leftover.len(),
                    requested
                )));
            }
            saved.extend(created);
        }

        let pool = self.local()?;
        ttlog_quiet(
            &pool.conn,
            "save",
            self.user.as_str(),
            &format!("saved {} entries", saved.len()),
        );
        Ok(saved)
    }

    fn discard(&self, placeholders: &[SessionEntry]) {
        let pool = match self.local() {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "could not roll back placeholders");
                return;
            }
        };
        for p in placeholders {
            if let Err(e) = queries::delete_by_key(&pool.conn, &p.key) {
                tracing::warn!(error = %e, key = p.key.as_str(), "placeholder rollback failed");
            }
        }
    }

    /// Patch an entry: locally first, then remotely; restored on failure.
    ///
    /// An id the local tier does not know yet is fetched from the remote.
    pub fn update_entry(&self, id: i64, patch: SessionPatch) -> AppResult<SessionEntry> {
        let cached = queries::find_by_remote_id(&self.local()?.conn, &self.user, id)?;
        let before = match cached {
            Some(e) => e,
            None => {
                let row = self
                    .remote
                    .fetch_session(&self.user, id)?
                    .ok_or(AppError::EntryNotFound(id))?;
                self.merge(std::slice::from_ref(&row))?;
                row
            }
        };

        let mut after = before.clone();
        after.apply(&patch);
        queries::upsert_entry(&self.local()?.conn, &after)?;

        if let Err(e) = self.remote.update_session(id, &patch) {
            tracing::warn!(id, error = %e, "remote update failed, restoring local entry");
            queries::upsert_entry(&self.local()?.conn, &before)?;
            return Err(e);
        }
        Ok(after)
    }

    /// Clearing is the terminal state of an entry: minutes go to 0, the row stays.
    pub fn clear_entry(&self, id: i64) -> AppResult<SessionEntry> {
        self.update_entry(id, SessionPatch::minutes(0))
    }

    /// Clear every persisted entry of `date`, as the remote currently has
    /// them. Returns how many were cleared.
    pub fn clear_day(&self, date: NaiveDate) -> AppResult<usize> {
        self.pull_day(date)?;
        let mut cleared = 0;
        for e in self.sessions_on(date)? {
            if let Some(id) = e.id {
                self.clear_entry(id)?;
                cleared += 1;
            }
        }
        let pool = self.local()?;
        ttlog_quiet(&pool.conn, "clear_day", &date.to_string(), &format!("cleared {cleared} entries"));
        Ok(cleared)
    }

    /// Drop everything cached for the user (sign-out).
    pub fn forget_local(&self) -> AppResult<usize> {
        let pool = self.local()?;
        let n = queries::delete_for_user(&pool.conn, &self.user)?;
        plans::delete_plan(&pool.conn, &self.user)?;
        ttlog_quiet(&pool.conn, "signout", self.user.as_str(), "local cache cleared");
        Ok(n)
    }
}
