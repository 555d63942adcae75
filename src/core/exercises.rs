use crate::errors::{AppError, AppResult};
use crate::models::UserId;
use crate::models::catalog::{CATALOG, is_catalog};
use crate::store::DocumentStore;

/// Catalog entries first, then the user's custom exercises in the order
/// they were first used.
pub async fn available<S: DocumentStore>(store: &S, user_id: &UserId) -> AppResult<Vec<String>> {
    let mut names: Vec<String> = CATALOG.iter().map(|c| c.to_string()).collect();
    if let Some(user) = store.get_user(user_id).await? {
        names.extend(user.custom_exercises);
    }
    Ok(names)
}

/// Record a non-catalog exercise on the user document (set semantics).
pub async fn remember_custom<S: DocumentStore>(
    store: &S,
    user_id: &UserId,
    name: &str,
) -> AppResult<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("exercise name is empty".into()));
    }
    if is_catalog(name) {
        return Ok(());
    }
    let mut added = false;
    store
        .update_user(user_id, |user| added = user.add_custom_exercise(name))
        .await?;
    if added {
        tracing::debug!(user = %user_id, exercise = name, "custom exercise remembered");
    }
    Ok(())
}
