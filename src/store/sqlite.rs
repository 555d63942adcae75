//! SQLite-backed document store and local identity provider.

use super::DocumentStore;
use crate::core::auth::{IdentityProvider, normalize_email, validate_password};
use crate::db::initialize::init_db;
use crate::db::log::{LogEntry, load_log, ttlog};
use crate::db::pool::DbPool;
use crate::db::queries::{self, AccountRow};
use crate::errors::{AppError, AppResult};
use crate::models::template::WorkoutTemplate;
use crate::models::user::{SessionContext, UserDoc};
use crate::models::workout::{NewWorkout, WorkoutDoc};
use crate::models::{TemplateId, UserId, WorkoutId};
use rusqlite::Connection;
use std::sync::Mutex;

pub struct SqliteStore {
    pool: Mutex<DbPool>,
    password_cost: u32,
}

impl SqliteStore {
    /// Open (and migrate) the database file at `path`.
    pub fn open(path: &str) -> AppResult<Self> {
        let pool = DbPool::new(path)?;
        init_db(&pool.conn)?;
        tracing::debug!(path, "document store opened");
        Ok(Self::from_pool(pool))
    }

    pub fn open_in_memory() -> AppResult<Self> {
        let pool = DbPool::in_memory()?;
        init_db(&pool.conn)?;
        Ok(Self::from_pool(pool))
    }

    fn from_pool(pool: DbPool) -> Self {
        Self {
            pool: Mutex::new(pool),
            password_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// bcrypt cost for new password hashes.
    pub fn with_password_cost(mut self, cost: u32) -> Self {
        self.password_cost = cost;
        self
    }

    fn with_conn<T, F>(&self, func: F) -> AppResult<T>
    where
        F: FnOnce(&mut Connection) -> AppResult<T>,
    {
        let mut pool = self
            .pool
            .lock()
            .map_err(|_| AppError::Remote("store connection lock poisoned".into()))?;
        pool.with_conn(func)
    }

    /// Append a line to the internal audit log.
    pub fn audit(&self, operation: &str, target: &str, message: &str) -> AppResult<()> {
        self.with_conn(|conn| ttlog(conn, operation, target, message))
    }

    pub fn log_entries(&self) -> AppResult<Vec<LogEntry>> {
        self.with_conn(|conn| load_log(conn))
    }

    /// Insert a workout document verbatim (fixtures, imports).
    pub fn insert_workout_doc(&self, doc: &WorkoutDoc) -> AppResult<()> {
        self.with_conn(|conn| Ok(queries::insert_workout_doc(conn, doc)?))
    }
}

fn user_not_found(id: &UserId) -> AppError {
    AppError::NotFound(format!("user {id}"))
}

impl DocumentStore for SqliteStore {
    async fn get_user(&self, id: &UserId) -> AppResult<Option<UserDoc>> {
        self.with_conn(|conn| Ok(queries::load_user(conn, id)?))
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserDoc>> {
        self.with_conn(|conn| Ok(queries::load_user_by_email(conn, email)?))
    }

    async fn ensure_user(&self, id: &UserId, email: &str) -> AppResult<UserDoc> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let user = match queries::load_user(&tx, id)? {
                Some(existing) => existing,
                None => {
                    let created = UserDoc::new(id.clone(), email);
                    queries::insert_user(&tx, &created)?;
                    tracing::info!(user = %id, "user document created");
                    created
                }
            };
            tx.commit()?;
            Ok(user)
        })
    }

    async fn update_user<F>(&self, id: &UserId, apply: F) -> AppResult<UserDoc>
    where
        F: FnOnce(&mut UserDoc),
    {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let mut user = queries::load_user(&tx, id)?.ok_or_else(|| user_not_found(id))?;
            apply(&mut user);
            queries::update_user(&tx, &user)?;
            tx.commit()?;
            Ok(user)
        })
    }

    async fn update_user_pair<F>(&self, first: &UserId, second: &UserId, apply: F) -> AppResult<()>
    where
        F: FnOnce(&mut UserDoc, &mut UserDoc),
    {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let mut a = queries::load_user(&tx, first)?.ok_or_else(|| user_not_found(first))?;
            let mut b = queries::load_user(&tx, second)?.ok_or_else(|| user_not_found(second))?;
            apply(&mut a, &mut b);
            queries::update_user(&tx, &a)?;
            queries::update_user(&tx, &b)?;
            // Dropping an uncommitted transaction rolls both writes back.
            tx.commit()?;
            Ok(())
        })
    }

    async fn add_template(
        &self,
        owner: &UserId,
        name: &str,
        exercises: &[String],
    ) -> AppResult<WorkoutTemplate> {
        let template = WorkoutTemplate {
            id: TemplateId::generate(),
            name: name.to_string(),
            exercises: exercises.to_vec(),
        };
        self.with_conn(|conn| {
            queries::insert_template(conn, owner, &template)?;
            Ok(())
        })?;
        Ok(template)
    }

    async fn templates(&self, owner: &UserId) -> AppResult<Vec<WorkoutTemplate>> {
        self.with_conn(|conn| Ok(queries::load_templates(conn, owner)?))
    }

    async fn delete_template(&self, owner: &UserId, id: &TemplateId) -> AppResult<bool> {
        self.with_conn(|conn| Ok(queries::delete_template(conn, owner, id)?))
    }

    async fn add_workout(&self, workout: NewWorkout) -> AppResult<WorkoutDoc> {
        self.with_conn(|conn| Ok(queries::insert_workout(conn, &workout)?))
    }

    async fn recent_workouts(&self, limit: usize) -> AppResult<Vec<WorkoutDoc>> {
        self.with_conn(|conn| Ok(queries::load_recent_workouts(conn, limit)?))
    }

    async fn workouts_by_owner(&self, owner: &UserId) -> AppResult<Vec<WorkoutDoc>> {
        self.with_conn(|conn| Ok(queries::load_workouts_by_owner(conn, owner)?))
    }

    async fn get_workout(&self, id: &WorkoutId) -> AppResult<Option<WorkoutDoc>> {
        self.with_conn(|conn| Ok(queries::load_workout(conn, id)?))
    }

    async fn delete_workout(&self, id: &WorkoutId) -> AppResult<bool> {
        self.with_conn(|conn| Ok(queries::delete_workout(conn, id)?))
    }
}

impl IdentityProvider for SqliteStore {
    async fn sign_up(&self, email: &str, password: &str) -> AppResult<SessionContext> {
        let email = normalize_email(email)?;
        validate_password(password)?;

        if self.with_conn(|conn| Ok(queries::load_account_by_email(conn, &email)?))?.is_some() {
            return Err(AppError::EmailTaken(email));
        }

        let account = AccountRow {
            id: UserId::generate(),
            email,
            password_hash: bcrypt::hash(password, self.password_cost)?,
        };

        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            queries::insert_account(&tx, &account)?;
            queries::save_auth_state(&tx, Some((&account.id, &account.email)))?;
            tx.commit()?;
            Ok(())
        })?;

        Ok(SessionContext {
            user_id: account.id,
            email: account.email,
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<SessionContext> {
        let email = normalize_email(email)?;
        let account = self
            .with_conn(|conn| Ok(queries::load_account_by_email(conn, &email)?))?
            .ok_or(AppError::InvalidCredentials)?;

        if !bcrypt::verify(password, &account.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        self.with_conn(|conn| {
            queries::save_auth_state(conn, Some((&account.id, &account.email)))?;
            Ok(())
        })?;

        Ok(SessionContext {
            user_id: account.id,
            email: account.email,
        })
    }

    async fn current_user(&self) -> AppResult<Option<SessionContext>> {
        let state = self.with_conn(|conn| Ok(queries::load_auth_state(conn)?))?;
        Ok(state.map(|(user_id, email)| SessionContext { user_id, email }))
    }

    async fn sign_out(&self) -> AppResult<()> {
        self.with_conn(|conn| Ok(queries::save_auth_state(conn, None)?))
    }
}
