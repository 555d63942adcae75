//! One module per subcommand; each exposes `handle`.

pub mod account;
pub mod config;
pub mod db;
pub mod exercises;
pub mod export;
pub mod feed;
pub mod friends;
pub mod history;
pub mod init;
pub mod log;
pub mod resume;
pub mod template;
pub mod workout;

use crate::config::Config;
use crate::core::auth::{AuthSession, ensure_user_document};
use crate::errors::AppResult;
use crate::models::user::SessionContext;
use crate::store::SqliteStore;
use crate::ui::messages::warning;

pub(crate) fn open_store(cfg: &Config) -> AppResult<SqliteStore> {
    Ok(SqliteStore::open(&cfg.database)?.with_password_cost(cfg.password_cost))
}

/// The signed-in user, with their document guaranteed to exist.
pub(crate) async fn signed_in(store: &SqliteStore) -> AppResult<SessionContext> {
    let auth = AuthSession::new(store);
    auth.restore().await?;
    let ctx = auth.require()?;
    ensure_user_document(store, &ctx).await?;
    Ok(ctx)
}

/// Audit lines never fail the command that produced them.
pub(crate) fn audit(store: &SqliteStore, operation: &str, target: &str, message: &str) {
    if let Err(e) = store.audit(operation, target, message) {
        warning(format!("Failed to write internal log: {e}"));
    }
}
