//! Local `sessions` collection: keyed by entry key, indexed by user and date.

use crate::errors::{AppError, AppResult};
use crate::models::category::Category;
use crate::models::session::{EntryKey, SessionEntry, UserId};
use chrono::{Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const SELECT_COLUMNS: &str = "SELECT key, remote_id, user_id, session_date, category, minutes FROM sessions";

fn conversion_error(err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(err))
}

pub fn map_row(row: &Row) -> Result<SessionEntry> {
    let date_str: String = row.get("session_date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| conversion_error(AppError::InvalidDate(date_str.clone())))?;

    let cat_str: String = row.get("category")?;
    let category = Category::from_db_str(&cat_str)
        .ok_or_else(|| conversion_error(AppError::InvalidCategory(cat_str.clone())))?;

    Ok(SessionEntry {
        key: EntryKey(row.get("key")?),
        id: row.get("remote_id")?,
        user_id: UserId(row.get("user_id")?),
        date,
        category,
        minutes: row.get("minutes")?,
    })
}

fn collect(conn: &Connection, sql: &str, args: &[&dyn rusqlite::ToSql]) -> AppResult<Vec<SessionEntry>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(args, map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    out.sort_by_key(|e| (e.date, e.category));
    Ok(out)
}

fn fmt_date(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// Insert or replace an entry by key.
pub fn upsert_entry(conn: &Connection, e: &SessionEntry) -> AppResult<()> {
    conn.execute(
        "INSERT INTO sessions (key, remote_id, user_id, session_date, category, minutes, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(key) DO UPDATE SET
            remote_id    = excluded.remote_id,
            session_date = excluded.session_date,
            category     = excluded.category,
            minutes      = excluded.minutes,
            updated_at   = excluded.updated_at",
        params![
            e.key.as_str(),
            e.id,
            e.user_id.as_str(),
            fmt_date(&e.date),
            e.category.to_db_str(),
            e.minutes,
            Local::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// Merge rows acknowledged by the remote store.
///
/// Rows are upserted by remote id; an optimistic placeholder for the same
/// (user, date, category) slot is superseded and removed.
pub fn merge_persisted(conn: &Connection, rows: &[SessionEntry]) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;
    for e in rows {
        if e.id.is_none() {
            continue;
        }
        tx.execute(
            "DELETE FROM sessions
             WHERE user_id = ?1 AND session_date = ?2 AND category = ?3
               AND remote_id IS NULL",
            params![e.user_id.as_str(), fmt_date(&e.date), e.category.to_db_str()],
        )?;
        upsert_entry(&tx, e)?;
    }
    tx.commit()?;
    Ok(())
}

pub fn load_for_user(conn: &Connection, user: &UserId) -> AppResult<Vec<SessionEntry>> {
    collect(
        conn,
        &format!("{SELECT_COLUMNS} WHERE user_id = ?1"),
        &[&user.as_str()],
    )
}

pub fn load_by_date(conn: &Connection, user: &UserId, date: &NaiveDate) -> AppResult<Vec<SessionEntry>> {
    collect(
        conn,
        &format!("{SELECT_COLUMNS} WHERE user_id = ?1 AND session_date = ?2"),
        &[&user.as_str(), &fmt_date(date)],
    )
}

pub fn load_range(
    conn: &Connection,
    user: &UserId,
    from: &NaiveDate,
    to: &NaiveDate,
) -> AppResult<Vec<SessionEntry>> {
    collect(
        conn,
        &format!("{SELECT_COLUMNS} WHERE user_id = ?1 AND session_date BETWEEN ?2 AND ?3"),
        &[&user.as_str(), &fmt_date(from), &fmt_date(to)],
    )
}

pub fn find_by_remote_id(conn: &Connection, user: &UserId, id: i64) -> AppResult<Option<SessionEntry>> {
    let sql = format!("{SELECT_COLUMNS} WHERE user_id = ?1 AND remote_id = ?2");
    let found = conn
        .query_row(&sql, params![user.as_str(), id], map_row)
        .optional()?;
    Ok(found)
}

pub fn delete_by_key(conn: &Connection, key: &EntryKey) -> AppResult<()> {
    conn.execute("DELETE FROM sessions WHERE key = ?1", [key.as_str()])?;
    Ok(())
}

/// Drop persisted rows inside [from, to] whose remote id is not in `keep`.
/// Placeholders are left alone. Returns the number of pruned rows.
pub fn prune_missing(
    conn: &Connection,
    user: &UserId,
    from: &NaiveDate,
    to: &NaiveDate,
    keep: &[i64],
) -> AppResult<usize> {
    let local = load_range(conn, user, from, to)?;
    let mut pruned = 0;
    for e in local {
        if let Some(id) = e.id
            && !keep.contains(&id)
        {
            delete_by_key(conn, &e.key)?;
            pruned += 1;
        }
    }
    Ok(pruned)
}

pub fn delete_for_user(conn: &Connection, user: &UserId) -> AppResult<usize> {
    let n = conn.execute("DELETE FROM sessions WHERE user_id = ?1", [user.as_str()])?;
    Ok(n)
}
