//! A user's own finished workouts.

use crate::errors::{AppError, AppResult};
use crate::models::workout::Workout;
use crate::models::{UserId, WorkoutId};
use crate::store::DocumentStore;

/// Own workouts, newest first. Documents without any usable date are
/// skipped.
pub async fn list_own<S: DocumentStore>(store: &S, user_id: &UserId) -> AppResult<Vec<Workout>> {
    let docs = store.workouts_by_owner(user_id).await?;
    let mut out = Vec::with_capacity(docs.len());
    for doc in docs {
        let id = doc.id.clone();
        match Workout::from_doc(doc) {
            Some(w) => out.push(w),
            None => tracing::warn!(workout = %id, "skipping workout without a usable timestamp"),
        }
    }
    out.sort_by(|a, b| b.performed_at.cmp(&a.performed_at));
    Ok(out)
}

/// Delete one of the user's own workouts. Someone else's workout is
/// reported exactly like a missing one.
pub async fn delete<S: DocumentStore>(
    store: &S,
    user_id: &UserId,
    workout_id: &WorkoutId,
) -> AppResult<()> {
    let not_found = || AppError::NotFound(format!("workout {workout_id}"));

    let doc = store.get_workout(workout_id).await?.ok_or_else(not_found)?;
    if &doc.user_id != user_id {
        tracing::debug!(user = %user_id, workout = %workout_id, "refusing to delete foreign workout");
        return Err(not_found());
    }
    if !store.delete_workout(workout_id).await? {
        return Err(not_found());
    }

    tracing::info!(user = %user_id, workout = %workout_id, "workout deleted");
    Ok(())
}
