use log::info;
use rusqlite::{Connection, Error, OptionalExtension, Result};

/// Ensure that the `log` table exists.
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

/// Check if a table exists.
fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Check if a table has a given column.
fn table_has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{}')", table))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Registered users and their upstream tokens.
fn create_credentials_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS credentials (
            user_id     TEXT PRIMARY KEY,
            token       TEXT NOT NULL,
            expires_at  TEXT,
            updated_at  TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Deferred fills. UNIQUE(user_id): at most one pending job per user.
fn create_pending_fills_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS pending_fills (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id      TEXT NOT NULL UNIQUE,
            token        TEXT NOT NULL,
            expires_at   TEXT,
            upstream_id  TEXT,
            target_date  TEXT NOT NULL,
            policy       TEXT NOT NULL CHECK(policy IN ('all_day','half_day','work_day')),
            start_early  INTEGER NOT NULL DEFAULT 0,
            created_at   TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_pending_fills_date ON pending_fills(target_date);
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

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    info!("Migration applied: {} → {}", version, message);
    Ok(())
}

/// Tokens decoded from a JWT may carry the upstream user id.
fn migrate_add_upstream_user_id(conn: &Connection) -> Result<(), Error> {
    let version = "20251102_0002_credentials_upstream_user_id";

    if migration_applied(conn, version)? {
        return Ok(());
    }

    if !table_has_column(conn, "credentials", "upstream_user_id")? {
        conn.execute("ALTER TABLE credentials ADD COLUMN upstream_user_id TEXT;", [])
            .map_err(|e| {
                Error::SqliteFailure(
                    rusqlite::ffi::Error::new(1),
                    Some(format!("Failed to add 'upstream_user_id' column: {}", e)),
                )
            })?;
    }

    mark_applied(conn, version, "Added upstream_user_id to credentials")
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    if !table_exists(conn, "credentials")? {
        create_credentials_table(conn)?;
        info!("Created credentials table.");
    }

    if !table_exists(conn, "pending_fills")? {
        create_pending_fills_table(conn)?;
        info!("Created pending_fills table.");
    }

    migrate_add_upstream_user_id(conn)?;

    Ok(())
}
