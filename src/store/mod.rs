//! Document store seam.
//!
//! Services never open the database themselves: they receive a
//! [`DocumentStore`] and talk to three collections through it.
//!
//! - `users/{userId}`: profile, friend ids, custom exercises, ongoing workout
//! - `users/{userId}/templates/{templateId}`
//! - `workouts/{workoutId}`
//!
//! [`SqliteStore`] is the shipped implementation; [`MemoryStore`] is a fake
//! with failure injection for tests.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::errors::AppResult;
use crate::models::template::WorkoutTemplate;
use crate::models::user::UserDoc;
use crate::models::workout::{NewWorkout, WorkoutDoc};
use crate::models::{TemplateId, UserId, WorkoutId};

/// Asynchronous access to the document collections. Every operation either
/// resolves or fails with an [`AppError`](crate::errors::AppError); failures
/// are never swallowed.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    async fn get_user(&self, id: &UserId) -> AppResult<Option<UserDoc>>;

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserDoc>>;

    /// Create `users/{id}` if it does not exist yet; return the stored document.
    async fn ensure_user(&self, id: &UserId, email: &str) -> AppResult<UserDoc>;

    /// Read-modify-write of one user document. `NotFound` if absent.
    async fn update_user<F>(&self, id: &UserId, apply: F) -> AppResult<UserDoc>
    where
        F: FnOnce(&mut UserDoc);

    /// Read-modify-write of two user documents as one transaction: either
    /// both writes land or neither does. `NotFound` if either is absent.
    async fn update_user_pair<F>(&self, first: &UserId, second: &UserId, apply: F) -> AppResult<()>
    where
        F: FnOnce(&mut UserDoc, &mut UserDoc);

    async fn add_template(
        &self,
        owner: &UserId,
        name: &str,
        exercises: &[String],
    ) -> AppResult<WorkoutTemplate>;

    async fn templates(&self, owner: &UserId) -> AppResult<Vec<WorkoutTemplate>>;

    /// Returns false if the owner had no such template.
    async fn delete_template(&self, owner: &UserId, id: &TemplateId) -> AppResult<bool>;

    /// Store assigns the id and the server timestamp.
    async fn add_workout(&self, workout: NewWorkout) -> AppResult<WorkoutDoc>;

    /// The `limit` most recent workouts of all users, newest first.
    async fn recent_workouts(&self, limit: usize) -> AppResult<Vec<WorkoutDoc>>;

    async fn workouts_by_owner(&self, owner: &UserId) -> AppResult<Vec<WorkoutDoc>>;

    async fn get_workout(&self, id: &WorkoutId) -> AppResult<Option<WorkoutDoc>>;

    /// Returns false if there was no such workout.
    async fn delete_workout(&self, id: &WorkoutId) -> AppResult<bool>;
}
