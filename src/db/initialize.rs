use crate::db::migrate::{pending_migrations, run_pending_migrations};
use crate::errors::AppResult;
use rusqlite::Connection;
use std::time::Duration;

/// Two CLI invocations may touch the same file at once.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Prepare a freshly opened connection: lock timeout, then every pending
/// migration. No table is created outside the migration list.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;

    let pending = pending_migrations(conn)?;
    if !pending.is_empty() {
        tracing::info!(count = pending.len(), "upgrading database schema");
    }
    run_pending_migrations(conn)?;
    Ok(())
}
