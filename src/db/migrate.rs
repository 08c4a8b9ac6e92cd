use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists; migration markers live in it.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Run `sql` once, recording `version` in the log table.
fn apply_once(conn: &Connection, version: &str, message: &str, sql: &str) -> Result<()> {
    if migration_applied(conn, version)? {
        return Ok(());
    }

    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    tx.commit()?;

    tracing::info!(version, "local store migration applied");
    Ok(())
}

/// Offline mirror of the remote `sessions` table.
const CREATE_SESSIONS: &str = r#"
    CREATE TABLE IF NOT EXISTS sessions (
        key          TEXT PRIMARY KEY,
        remote_id    INTEGER UNIQUE,
        user_id      TEXT NOT NULL,
        session_date TEXT NOT NULL,
        category     TEXT NOT NULL CHECK(category IN ('scales','review','new','technique')),
        minutes      INTEGER NOT NULL DEFAULT 0 CHECK(minutes >= 0),
        updated_at   TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);
    CREATE INDEX IF NOT EXISTS idx_sessions_user_date ON sessions(user_id, session_date);
"#;

/// Offline copy of the per-user plan. `items` is a JSON array.
const CREATE_WEEKLY_PLANS: &str = r#"
    CREATE TABLE IF NOT EXISTS weekly_plans (
        key                TEXT PRIMARY KEY,
        user_id            TEXT NOT NULL,
        week_start         TEXT NOT NULL,
        daily_goal_minutes INTEGER NOT NULL,
        items              TEXT NOT NULL,
        updated_at         TEXT
    );

    CREATE INDEX IF NOT EXISTS idx_weekly_plans_user_week ON weekly_plans(user_id, week_start);
"#;

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    apply_once(
        conn,
        "20261019_0001_create_sessions",
        "Created local sessions collection",
        CREATE_SESSIONS,
    )?;

    apply_once(
        conn,
        "20261019_0002_create_weekly_plans",
        "Created local weekly_plans collection",
        CREATE_WEEKLY_PLANS,
    )?;

    Ok(())
}
