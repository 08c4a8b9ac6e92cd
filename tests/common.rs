#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDate;
use practicelog::db::initialize::init_db;
use practicelog::db::pool::DbPool;
use practicelog::errors::{AppError, AppResult};
use practicelog::core::repository::Repository;
use practicelog::models::session::{NewSession, SessionEntry, SessionPatch, UserId};
use practicelog::remote::sqlite::SqliteRemote;
use practicelog::remote::{PlanRow, PushSubscription, RemoteStore};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use tempfile::TempDir;

pub const USER: &str = "user-1";

pub fn plog() -> Command {
    cargo_bin_cmd!("practicelog")
}

/// Temp home with its own local and remote stores.
pub struct Sandbox {
    pub dir: TempDir,
    pub db: String,
    pub remote: String,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = dir.path().join("local.sqlite").to_string_lossy().to_string();
        let remote = dir.path().join("remote.sqlite").to_string_lossy().to_string();
        Self { dir, db, remote }
    }

    /// `practicelog --db .. --remote .. --user user-1 --test <args>`
    pub fn cmd(&self, args: &[&str]) -> Command {
        let mut cmd = self.anonymous(args);
        cmd.args(["--user", USER]);
        cmd
    }

    /// Same as `cmd`, without a user.
    pub fn anonymous(&self, args: &[&str]) -> Command {
        let mut cmd = plog();
        cmd.env("HOME", self.dir.path())
            .env_remove("RUST_LOG")
            .env_remove("PRACTICELOG_DEBUG_LOG")
            .args(["--db", &self.db, "--remote", &self.remote, "--test"])
            .args(args);
        cmd
    }
}

pub fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
}

pub fn user() -> UserId {
    UserId::new(USER)
}

pub fn local_pool() -> DbPool {
    let pool = DbPool::in_memory().expect("in-memory pool");
    init_db(&pool.conn).expect("migrations");
    pool
}

pub fn repo_on(remote: Arc<dyn RemoteStore>) -> Arc<Repository> {
    Arc::new(Repository::new(user(), local_pool(), remote))
}

/// SQLite remote wrapped with switchable failures.
pub struct FaultyRemote {
    pub inner: SqliteRemote,
    pub fail_fetch: AtomicBool,
    pub fail_insert: AtomicBool,
    pub fail_update: AtomicBool,
    /// At most this many rows of a batch are created.
    pub insert_cap: AtomicUsize,
    pub inserts: AtomicUsize,
    /// When set, the next `fetch_sessions` parks on the barriers.
    pub block_next_fetch: AtomicBool,
    pub entered: Barrier,
    pub release: Barrier,
}

impl FaultyRemote {
    pub fn new() -> Self {
        Self {
            inner: SqliteRemote::open_in_memory().expect("remote"),
            fail_fetch: AtomicBool::new(false),
            fail_insert: AtomicBool::new(false),
            fail_update: AtomicBool::new(false),
            insert_cap: AtomicUsize::new(usize::MAX),
            inserts: AtomicUsize::new(0),
            block_next_fetch: AtomicBool::new(false),
            entered: Barrier::new(2),
            release: Barrier::new(2),
        }
    }

    pub fn set(flag: &AtomicBool, on: bool) {
        flag.store(on, Ordering::SeqCst);
    }

    pub fn insert_calls(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    fn down() -> AppError {
        AppError::Remote("connection refused".into())
    }
}

impl RemoteStore for FaultyRemote {
    fn fetch_sessions(&self, user: &UserId, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<SessionEntry>> {
        if self.block_next_fetch.swap(false, Ordering::SeqCst) {
            self.entered.wait();
            self.release.wait();
        }
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(Self::down());
        }
        self.inner.fetch_sessions(user, from, to)
    }

    fn fetch_session(&self, user: &UserId, id: i64) -> AppResult<Option<SessionEntry>> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(Self::down());
        }
        self.inner.fetch_session(user, id)
    }

    fn insert_sessions(&self, rows: &[NewSession]) -> AppResult<Vec<SessionEntry>> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(Self::down());
        }
        let cap = self.insert_cap.load(Ordering::SeqCst).min(rows.len());
        self.inner.insert_sessions(&rows[..cap])
    }

    fn update_session(&self, id: i64, patch: &SessionPatch) -> AppResult<()> {
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(Self::down());
        }
        self.inner.update_session(id, patch)
    }

    fn delete_session(&self, id: i64) -> AppResult<()> {
        self.inner.delete_session(id)
    }

    fn fetch_plan(&self, user: &UserId) -> AppResult<Option<PlanRow>> {
        self.inner.fetch_plan(user)
    }

    fn insert_plan(&self, row: &PlanRow) -> AppResult<()> {
        self.inner.insert_plan(row)
    }

    fn upsert_plan(&self, row: &PlanRow) -> AppResult<()> {
        self.inner.upsert_plan(row)
    }

    fn fetch_push_subscriptions(&self) -> AppResult<Vec<PushSubscription>> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(Self::down());
        }
        self.inner.fetch_push_subscriptions()
    }
}
