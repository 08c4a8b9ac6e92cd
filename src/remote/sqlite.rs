//! Relational backend kept in a SQLite file.
//!
//! Same tables as the hosted backend. It adds a unique index on
//! (user_id, session_date, category) so a lost reconciliation race cannot
//! create a duplicate; conflicting rows are reported as not created.

use super::{PlanRow, PushSubscription, RemoteStore};
use crate::errors::{AppError, AppResult};
use crate::models::category::Category;
use crate::models::session::{NewSession, SessionEntry, SessionPatch, UserId};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS plan (
        user_id           TEXT PRIMARY KEY,
        daily_goal        INTEGER,
        scales_minutes    INTEGER,
        scales_note       TEXT,
        review_minutes    INTEGER,
        review_note       TEXT,
        new_minutes       INTEGER,
        new_note          TEXT,
        technique_minutes INTEGER,
        technique_note    TEXT,
        updated_at        TEXT
    );

    CREATE TABLE IF NOT EXISTS sessions (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id      TEXT NOT NULL,
        session_date TEXT NOT NULL,
        category     TEXT NOT NULL CHECK(category IN ('scales','review','new','technique')),
        minutes      INTEGER NOT NULL DEFAULT 0 CHECK(minutes >= 0)
    );

    CREATE UNIQUE INDEX IF NOT EXISTS uq_sessions_user_date_category
        ON sessions(user_id, session_date, category);

    CREATE TABLE IF NOT EXISTS push_subscriptions (
        id       INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id  TEXT,
        endpoint TEXT NOT NULL,
        p256dh   TEXT NOT NULL,
        auth     TEXT NOT NULL
    );
"#;

pub struct SqliteRemote {
    conn: Mutex<Connection>,
}

impl SqliteRemote {
    pub fn open(path: &str) -> AppResult<Self> {
        let conn = Connection::open(Path::new(path))?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> AppResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> AppResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::LockPoisoned("sqlite remote"))
    }

    /// Register a browser push endpoint (normally done by the web client).
    pub fn add_push_subscription(
        &self,
        user: Option<&UserId>,
        endpoint: &str,
        p256dh: &str,
        auth: &str,
    ) -> AppResult<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO push_subscriptions (user_id, endpoint, p256dh, auth) VALUES (?1, ?2, ?3, ?4)",
            params![user.map(|u| u.as_str()), endpoint, p256dh, auth],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Number of session rows stored for `user`, all dates.
    pub fn count_sessions(&self, user: &UserId) -> AppResult<usize> {
        let conn = self.conn()?;
        let n: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sessions WHERE user_id = ?1",
            [user.as_str()],
            |r| r.get(0),
        )?;
        Ok(n as usize)
    }
}

fn map_session(row: &Row) -> rusqlite::Result<(i64, String, String, String, u32)> {
    Ok((
        row.get("id")?,
        row.get("user_id")?,
        row.get("session_date")?,
        row.get("category")?,
        row.get("minutes")?,
    ))
}

fn into_entry((id, user, date, cat, minutes): (i64, String, String, String, u32)) -> AppResult<SessionEntry> {
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| AppError::InvalidDate(date.clone()))?;
    let category = Category::from_db_str(&cat).ok_or(AppError::InvalidCategory(cat))?;
    Ok(SessionEntry::persisted(id, UserId(user), date, category, minutes))
}

fn map_plan(row: &Row) -> rusqlite::Result<PlanRow> {
    Ok(PlanRow {
        user_id: row.get("user_id")?,
        daily_goal: row.get("daily_goal")?,
        scales_minutes: row.get("scales_minutes")?,
        scales_note: row.get("scales_note")?,
        review_minutes: row.get("review_minutes")?,
        review_note: row.get("review_note")?,
        new_minutes: row.get("new_minutes")?,
        new_note: row.get("new_note")?,
        technique_minutes: row.get("technique_minutes")?,
        technique_note: row.get("technique_note")?,
        updated_at: row.get("updated_at")?,
    })
}

const PLAN_INSERT: &str = "INSERT INTO plan (
        user_id, daily_goal,
        scales_minutes, scales_note, review_minutes, review_note,
        new_minutes, new_note, technique_minutes, technique_note,
        updated_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";

fn plan_params(r: &PlanRow) -> [&dyn rusqlite::ToSql; 11] {
    [
        &r.user_id,
        &r.daily_goal,
        &r.scales_minutes,
        &r.scales_note,
        &r.review_minutes,
        &r.review_note,
        &r.new_minutes,
        &r.new_note,
        &r.technique_minutes,
        &r.technique_note,
        &r.updated_at,
    ]
}

impl RemoteStore for SqliteRemote {
    fn fetch_sessions(&self, user: &UserId, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<SessionEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, session_date, category, minutes FROM sessions
             WHERE user_id = ?1 AND session_date >= ?2 AND session_date <= ?3
             ORDER BY session_date ASC, id ASC",
        )?;
        let rows = stmt.query_map(
            params![
                user.as_str(),
                from.format("%Y-%m-%d").to_string(),
                to.format("%Y-%m-%d").to_string()
            ],
            map_session,
        )?;

        let mut out = Vec::new();
        for r in rows {
            out.push(into_entry(r?)?);
        }
        Ok(out)
    }

    fn fetch_session(&self, user: &UserId, id: i64) -> AppResult<Option<SessionEntry>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT id, user_id, session_date, category, minutes FROM sessions
                 WHERE id = ?1 AND user_id = ?2",
                params![id, user.as_str()],
                map_session,
            )
            .optional()?;
        row.map(into_entry).transpose()
    }

    fn insert_sessions(&self, rows: &[NewSession]) -> AppResult<Vec<SessionEntry>> {
        let conn = self.conn()?;
        let tx = conn.unchecked_transaction()?;
        let mut created = Vec::with_capacity(rows.len());

        for r in rows {
            let changed = tx.execute(
                "INSERT OR IGNORE INTO sessions (user_id, session_date, category, minutes)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    r.user_id.as_str(),
                    r.date.format("%Y-%m-%d").to_string(),
                    r.category.to_db_str(),
                    r.minutes,
                ],
            )?;
            if changed == 0 {
                tracing::debug!(date = %r.date, category = %r.category, "duplicate session row ignored");
                continue;
            }
            created.push(SessionEntry::persisted(
                tx.last_insert_rowid(),
                r.user_id.clone(),
                r.date,
                r.category,
                r.minutes,
            ));
        }

        tx.commit()?;
        Ok(created)
    }

    fn update_session(&self, id: i64, patch: &SessionPatch) -> AppResult<()> {
        if patch.is_empty() {
            return Ok(());
        }
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE sessions
             SET category = COALESCE(?1, category),
                 minutes  = COALESCE(?2, minutes)
             WHERE id = ?3",
            params![patch.category.map(|c| c.to_db_str()), patch.minutes, id],
        )?;
        if changed == 0 {
            return Err(AppError::EntryNotFound(id));
        }
        Ok(())
    }

    fn delete_session(&self, id: i64) -> AppResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM sessions WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(AppError::EntryNotFound(id));
        }
        Ok(())
    }

    fn fetch_plan(&self, user: &UserId) -> AppResult<Option<PlanRow>> {
        let conn = self.conn()?;
        let row = conn
            .query_row("SELECT * FROM plan WHERE user_id = ?1", [user.as_str()], map_plan)
            .optional()?;
        Ok(row)
    }

    fn insert_plan(&self, row: &PlanRow) -> AppResult<()> {
        let conn = self.conn()?;
        conn.execute(PLAN_INSERT, &plan_params(row)[..])?;
        Ok(())
    }

    fn upsert_plan(&self, row: &PlanRow) -> AppResult<()> {
        let conn = self.conn()?;
        let sql = format!(
            "{PLAN_INSERT}
             ON CONFLICT(user_id) DO UPDATE SET
                daily_goal        = excluded.daily_goal,
                scales_minutes    = excluded.scales_minutes,
                scales_note       = excluded.scales_note,
                review_minutes    = excluded.review_minutes,
                review_note       = excluded.review_note,
                new_minutes       = excluded.new_minutes,
                new_note          = excluded.new_note,
                technique_minutes = excluded.technique_minutes,
                technique_note    = excluded.technique_note,
                updated_at        = excluded.updated_at"
        );
        conn.execute(&sql, &plan_params(row)[..])?;
        Ok(())
    }

    fn fetch_push_subscriptions(&self) -> AppResult<Vec<PushSubscription>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, user_id, endpoint, p256dh, auth FROM push_subscriptions ORDER BY id")?;
        let rows = stmt.query_map([], |r| {
            Ok(PushSubscription {
                id: r.get(0)?,
                user_id: r.get(1)?,
                endpoint: r.get(2)?,
                p256dh: r.get(3)?,
                auth: r.get(4)?,
            })
        })?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }
}
