//! In-process document store for tests and dry runs.
//!
//! Writes can be made to fail on demand to exercise the error paths of the
//! services (a failed write never changes any document).

use super::DocumentStore;
use crate::errors::{AppError, AppResult};
use crate::models::template::WorkoutTemplate;
use crate::models::user::UserDoc;
use crate::models::workout::{NewWorkout, WorkoutDoc};
use crate::models::{TemplateId, UserId, WorkoutId};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Collections {
    users: BTreeMap<UserId, UserDoc>,
    templates: Vec<(UserId, WorkoutTemplate)>,
    /// Insertion order; recency is derived from timestamps.
    workouts: Vec<WorkoutDoc>,
}

#[derive(Default)]
pub struct MemoryStore {
    docs: Mutex<Collections>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
    /// Writes still allowed before they start failing; `None` is unlimited.
    write_budget: Mutex<Option<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with a `Remote` error. Turning it
    /// off also lifts any limit set by [`fail_writes_after`](Self::fail_writes_after).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
        if !fail {
            self.set_write_budget(None);
        }
    }

    /// Let the next `n` writes through, then fail every write after them.
    pub fn fail_writes_after(&self, n: usize) {
        self.set_write_budget(Some(n));
    }

    fn set_write_budget(&self, budget: Option<usize>) {
        if let Ok(mut b) = self.write_budget.lock() {
            *b = budget;
        }
    }

    /// Make every subsequent read fail with a `Remote` error.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Insert a workout document verbatim (missing timestamps, old dates).
    pub fn insert_workout_doc(&self, doc: &WorkoutDoc) -> AppResult<()> {
        self.docs()?.workouts.push(doc.clone());
        Ok(())
    }

    fn docs(&self) -> AppResult<MutexGuard<'_, Collections>> {
        self.docs
            .lock()
            .map_err(|_| AppError::Remote("memory store lock poisoned".into()))
    }

    fn read(&self) -> AppResult<MutexGuard<'_, Collections>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Remote("simulated read failure".into()));
        }
        self.docs()
    }

    fn write(&self) -> AppResult<MutexGuard<'_, Collections>> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Remote("simulated write failure".into()));
        }
        {
            let mut budget = self
                .write_budget
                .lock()
                .map_err(|_| AppError::Remote("memory store lock poisoned".into()))?;
            match *budget {
                Some(0) => return Err(AppError::Remote("simulated write failure".into())),
                Some(ref mut left) => *left -= 1,
                None => {}
            }
        }
        self.docs()
    }
}

impl DocumentStore for MemoryStore {
    async fn get_user(&self, id: &UserId) -> AppResult<Option<UserDoc>> {
        Ok(self.read()?.users.get(id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserDoc>> {
        Ok(self
            .read()?
            .users
            .values()
            .filter(|u| u.email == email)
            .min_by_key(|u| u.created_at)
            .cloned())
    }

    async fn ensure_user(&self, id: &UserId, email: &str) -> AppResult<UserDoc> {
        if let Some(existing) = self.read()?.users.get(id) {
            return Ok(existing.clone());
        }
        let mut docs = self.write()?;
        let user = docs
            .users
            .entry(id.clone())
            .or_insert_with(|| UserDoc::new(id.clone(), email));
        Ok(user.clone())
    }

    async fn update_user<F>(&self, id: &UserId, apply: F) -> AppResult<UserDoc>
    where
        F: FnOnce(&mut UserDoc),
    {
        let mut docs = self.write()?;
        let user = docs
            .users
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;
        apply(user);
        Ok(user.clone())
    }

    async fn update_user_pair<F>(&self, first: &UserId, second: &UserId, apply: F) -> AppResult<()>
    where
        F: FnOnce(&mut UserDoc, &mut UserDoc),
    {
        let mut docs = self.write()?;
        let mut a = docs
            .users
            .get(first)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("user {first}")))?;
        let mut b = docs
            .users
            .get(second)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("user {second}")))?;
        apply(&mut a, &mut b);
        docs.users.insert(a.id.clone(), a);
        docs.users.insert(b.id.clone(), b);
        Ok(())
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
        self.write()?
            .templates
            .push((owner.clone(), template.clone()));
        Ok(template)
    }

    async fn templates(&self, owner: &UserId) -> AppResult<Vec<WorkoutTemplate>> {
        Ok(self
            .read()?
            .templates
            .iter()
            .filter(|(o, _)| o == owner)
            .map(|(_, t)| t.clone())
            .collect())
    }

    async fn delete_template(&self, owner: &UserId, id: &TemplateId) -> AppResult<bool> {
        let mut docs = self.write()?;
        let before = docs.templates.len();
        docs.templates.retain(|(o, t)| !(o == owner && &t.id == id));
        Ok(docs.templates.len() != before)
    }

    async fn add_workout(&self, workout: NewWorkout) -> AppResult<WorkoutDoc> {
        let doc = WorkoutDoc {
            id: WorkoutId::generate(),
            user_id: workout.user_id,
            user_email: workout.user_email,
            exercises: workout.exercises,
            duration: workout.duration,
            timestamp: Some(Utc::now()),
            date: workout.date,
        };
        self.write()?.workouts.push(doc.clone());
        Ok(doc)
    }

    async fn recent_workouts(&self, limit: usize) -> AppResult<Vec<WorkoutDoc>> {
        let docs = self.read()?;
        // Newest insert first, then a stable sort by timestamp: ties keep
        // insertion recency and undated documents sink to the end.
        let mut all: Vec<WorkoutDoc> = docs.workouts.iter().rev().cloned().collect();
        all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        all.truncate(limit);
        Ok(all)
    }

    async fn workouts_by_owner(&self, owner: &UserId) -> AppResult<Vec<WorkoutDoc>> {
        let docs = self.read()?;
        let mut own: Vec<WorkoutDoc> = docs
            .workouts
            .iter()
            .rev()
            .filter(|w| &w.user_id == owner)
            .cloned()
            .collect();
        own.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(own)
    }

    async fn get_workout(&self, id: &WorkoutId) -> AppResult<Option<WorkoutDoc>> {
        Ok(self.read()?.workouts.iter().find(|w| &w.id == id).cloned())
    }

    async fn delete_workout(&self, id: &WorkoutId) -> AppResult<bool> {
        let mut docs = self.write()?;
        let before = docs.workouts.len();
        docs.workouts.retain(|w| &w.id != id);
        Ok(docs.workouts.len() != before)
    }
}
