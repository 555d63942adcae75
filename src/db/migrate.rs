use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// A forward-only schema step, recorded in `log` once applied.
struct Migration {
    version: &'static str,
    message: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20260301_0001_document_collections",
        message: "Created users, templates and workouts collections",
        sql: r#"
        CREATE TABLE IF NOT EXISTS users (
            id               TEXT PRIMARY KEY,
            email            TEXT NOT NULL,
            friends          TEXT NOT NULL DEFAULT '[]',
            custom_exercises TEXT NOT NULL DEFAULT '[]',
            ongoing_workout  TEXT,
            created_at       TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);

        CREATE TABLE IF NOT EXISTS templates (
            id         TEXT PRIMARY KEY,
            user_id    TEXT NOT NULL REFERENCES users(id),
            name       TEXT NOT NULL,
            exercises  TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_templates_user ON templates(user_id);

        CREATE TABLE IF NOT EXISTS workouts (
            id         TEXT PRIMARY KEY,
            user_id    TEXT NOT NULL,
            user_email TEXT NOT NULL DEFAULT '',
            exercises  TEXT NOT NULL DEFAULT '[]',
            duration   INTEGER NOT NULL DEFAULT 0,
            timestamp  TEXT,
            date       TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_workouts_user ON workouts(user_id);
        "#,
    },
    Migration {
        version: "20260301_0002_local_identity",
        message: "Created accounts and auth_state tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS accounts (
            id            TEXT PRIMARY KEY,
            email         TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS auth_state (
            slot         INTEGER PRIMARY KEY CHECK(slot = 1),
            user_id      TEXT NOT NULL,
            email        TEXT NOT NULL,
            signed_in_at TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20260412_0003_workouts_recency_index",
        message: "Added recency index on workouts.timestamp",
        sql: r#"
        CREATE INDEX IF NOT EXISTS idx_workouts_timestamp ON workouts(timestamp DESC);
        "#,
    },
];

/// Ensure that the `log` table exists. Migrations are tracked in it.
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

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(m.sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [m.version, m.message],
    )?;
    tx.commit()
}

/// Versions not yet applied, in order.
pub fn pending_migrations(conn: &Connection) -> Result<Vec<&'static str>> {
    ensure_log_table(conn)?;
    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        tracing::debug!(version = m.version, "migration applied");
        success(format!("Migration applied: {} → {}", m.version, m.message));
    }

    Ok(())
}
