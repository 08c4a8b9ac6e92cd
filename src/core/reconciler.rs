//! Daily entry reconciliation.
//!
//! Guarantees that a date shown to the user has exactly one entry per
//! category, creating zero-minute rows for the missing ones. The local tier
//! is checked first (no network in steady state), then the remote store is
//! re-checked because the local tier may be stale relative to another
//! device or process. One pass runs at a time for the whole reconciler;
//! a call arriving while a pass is running is dropped, not queued.

use crate::core::repository::Repository;
use crate::models::category::Category;
use crate::models::session::NewSession;
use crate::utils::date;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

/// Trailing window checked by `ensure_all_days_have_entries`.
pub const DEFAULT_WINDOW_DAYS: u32 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileStatus {
    Idle,
    Reconciling,
}

/// What a single `ensure_daily_entries` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Local state already had every category; no network call.
    AlreadyComplete,
    /// Another pass was running; nothing was done.
    Busy,
    /// The remote store already had the missing rows; they were merged.
    ConfirmedRemote { merged: usize },
    /// Zero-minute rows were inserted. `created < requested` on partial failure.
    Created { requested: usize, created: usize },
    /// A store call failed; the error was logged.
    Failed,
}

pub struct Reconciler {
    repo: Arc<Repository>,
    status: Mutex<ReconcileStatus>,
    window_days: u32,
}

/// Puts the status back to `Idle` when dropped, error paths included.
struct PassGuard<'a> {
    status: &'a Mutex<ReconcileStatus>,
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        match self.status.lock() {
            Ok(mut s) => *s = ReconcileStatus::Idle,
            Err(poisoned) => *poisoned.into_inner() = ReconcileStatus::Idle,
        }
    }
}

impl Reconciler {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self {
            repo,
            status: Mutex::new(ReconcileStatus::Idle),
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }

    pub fn with_window_days(mut self, days: u32) -> Self {
        self.window_days = days.max(1);
        self
    }

    pub fn repository(&self) -> &Arc<Repository> {
        &self.repo
    }

    pub fn status(&self) -> ReconcileStatus {
        match self.status.lock() {
            Ok(s) => *s,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// `Idle → Reconciling`, or None when a pass is already running.
    fn try_begin(&self) -> Option<PassGuard<'_>> {
        let mut s = match self.status.lock() {
            Ok(s) => s,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *s == ReconcileStatus::Reconciling {
            return None;
        }
        *s = ReconcileStatus::Reconciling;
        Some(PassGuard {
            status: &self.status,
        })
    }

    /// Make sure `date` has one entry per category. Best effort: failures are
    /// logged and reported through the outcome, never raised.
    pub fn ensure_daily_entries(&self, date: NaiveDate) -> ReconcileOutcome {
        let local = match self.repo.local_categories_on(date) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(%date, error = %e, "local lookup failed");
                return ReconcileOutcome::Failed;
            }
        };

        let missing = missing_from(&local);
        if missing.is_empty() {
            tracing::debug!(%date, "all categories present locally");
            return ReconcileOutcome::AlreadyComplete;
        }

        let Some(_pass) = self.try_begin() else {
            tracing::debug!(%date, "reconciliation already running, skipped");
            return ReconcileOutcome::Busy;
        };

        let remote_rows = match self.repo.pull_day(date) {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(%date, error = %e, "remote re-check failed");
                return ReconcileOutcome::Failed;
            }
        };

        let on_remote: BTreeSet<Category> = remote_rows.iter().map(|r| r.category).collect();
        let truly_missing: Vec<Category> = missing
            .into_iter()
            .filter(|c| !on_remote.contains(c))
            .collect();

        if truly_missing.is_empty() {
            tracing::debug!(%date, merged = remote_rows.len(), "missing categories found remotely");
            return ReconcileOutcome::ConfirmedRemote {
                merged: remote_rows.len(),
            };
        }

        let batch: Vec<NewSession> = truly_missing
            .iter()
            .map(|c| NewSession::zero(self.repo.user().clone(), date, *c))
            .collect();

        match self.repo.insert_remote(&batch) {
            Ok(created) => {
                if created.len() < batch.len() {
                    tracing::warn!(
                        %date,
                        requested = batch.len(),
                        created = created.len(),
                        "partial insert, remaining categories stay missing"
                    );
                } else {
                    tracing::info!(%date, created = created.len(), "created daily entries");
                }
                ReconcileOutcome::Created {
                    requested: batch.len(),
                    created: created.len(),
                }
            }
            Err(e) => {
                tracing::warn!(%date, error = %e, "creating daily entries failed");
                ReconcileOutcome::Failed
            }
        }
    }

    /// Reconcile every day of the trailing window ending at `today`,
    /// one day after another.
    pub fn ensure_all_days_have_entries(&self, today: NaiveDate) -> Vec<(NaiveDate, ReconcileOutcome)> {
        if self.status() == ReconcileStatus::Reconciling {
            tracing::debug!("reconciliation already running, window skipped");
            return Vec::new();
        }

        let mut out = Vec::new();
        for day in date::last_n_dates(today, self.window_days) {
            let have = match self.repo.local_categories_on(day) {
                Ok(c) => c.len(),
                Err(e) => {
                    tracing::warn!(date = %day, error = %e, "local lookup failed");
                    continue;
                }
            };
            if have >= Category::COUNT {
                continue;
            }
            out.push((day, self.ensure_daily_entries(day)));
        }
        out
    }
}

fn missing_from(present: &BTreeSet<Category>) -> Vec<Category> {
    Category::ALL
        .iter()
        .copied()
        .filter(|c| !present.contains(c))
        .collect()
}
