//! In-progress workout: the live session, its persisted snapshot and the
//! resume-or-end decision after the next sign-in.
//!
//! ```text
//!            start                      end (save ok)
//!   Idle ───────────────► Active ───────────────────► Ended
//!    ▲                    │  ▲                          │
//!    │ on_authenticated   │  │ resume                   │ start
//!    │ (no snapshot)      ▼  │                          ▼
//!    └────────────── PendingResume ──────────────────► Ended
//!                      suspend / on_authenticated      end_pending
//! ```
//!
//! Every mutation of an active session is written to the user's
//! `ongoingWorkout` before it is committed locally, so whatever is on screen
//! is also what a later sign-in will offer to resume.

use crate::core::auth::ensure_user_document;
use crate::core::ticker::{DEFAULT_TICK, ElapsedTimer};
use crate::errors::{AppError, AppResult};
use crate::models::catalog::catalog_name;
use crate::models::snapshot::OngoingWorkoutSnapshot;
use crate::models::template::WorkoutTemplate;
use crate::models::user::{SessionContext, UserDoc};
use crate::models::workout::{ExerciseEntry, SetEntry, Workout};
use crate::store::DocumentStore;
use crate::utils::formatting::format_duration;
use std::time::Duration;

pub struct ActiveWorkout {
    exercises: Vec<ExerciseEntry>,
    timer: ElapsedTimer,
}

impl ActiveWorkout {
    fn new(exercises: Vec<ExerciseEntry>, elapsed: u64, tick: Duration) -> Self {
        Self {
            exercises,
            timer: ElapsedTimer::start(elapsed, tick),
        }
    }

    pub fn exercises(&self) -> &[ExerciseEntry] {
        &self.exercises
    }

    pub fn elapsed(&self) -> u64 {
        self.timer.seconds()
    }

    pub fn timer(&self) -> &ElapsedTimer {
        &self.timer
    }

    fn snapshot(&self) -> OngoingWorkoutSnapshot {
        OngoingWorkoutSnapshot::new(self.exercises.clone(), self.elapsed())
    }
}

pub enum SessionState {
    /// No workout running and nothing to resume.
    Idle,
    Active(ActiveWorkout),
    /// A snapshot from an earlier run is waiting for resume or end.
    PendingResume(OngoingWorkoutSnapshot),
    /// The last workout was saved.
    Ended(Workout),
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Active(_) => "active",
            SessionState::PendingResume(_) => "pending-resume",
            SessionState::Ended(_) => "ended",
        }
    }
}

pub struct SessionController<'a, S: DocumentStore> {
    store: &'a S,
    ctx: SessionContext,
    tick: Duration,
    state: SessionState,
}

impl<'a, S: DocumentStore> SessionController<'a, S> {
    pub fn new(store: &'a S, ctx: SessionContext) -> Self {
        Self {
            store,
            ctx,
            tick: DEFAULT_TICK,
            state: SessionState::Idle,
        }
    }

    /// Wall-clock length of one elapsed second.
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active(_))
    }

    pub fn active(&self) -> Option<&ActiveWorkout> {
        match &self.state {
            SessionState::Active(active) => Some(active),
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<&OngoingWorkoutSnapshot> {
        match &self.state {
            SessionState::PendingResume(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn exercises(&self) -> Option<&[ExerciseEntry]> {
        self.active().map(ActiveWorkout::exercises)
    }

    pub fn elapsed(&self) -> Option<u64> {
        self.active().map(ActiveWorkout::elapsed)
    }

    /// Run after every successful authentication. Ensures the user document
    /// and looks for a workout left behind by an earlier run. An active
    /// session is left untouched.
    pub async fn on_authenticated(&mut self) -> AppResult<&SessionState> {
        if self.is_active() {
            return Ok(&self.state);
        }

        let user = ensure_user_document(self.store, &self.ctx).await?;
        self.state = match user.ongoing_workout {
            Some(snapshot) => {
                tracing::info!(
                    user = %self.ctx.user_id,
                    exercises = snapshot.exercises.len(),
                    elapsed = snapshot.elapsed_time,
                    "unfinished workout found"
                );
                SessionState::PendingResume(snapshot)
            }
            None => SessionState::Idle,
        };
        Ok(&self.state)
    }

    /// Start a new workout, empty or pre-filled from a template.
    ///
    /// Refused while another session is active or an unfinished one exists,
    /// including one the store knows about but this controller has not seen.
    pub async fn start(&mut self, template: Option<&WorkoutTemplate>) -> AppResult<()> {
        match self.state {
            SessionState::Active(_) | SessionState::PendingResume(_) => {
                return Err(AppError::SessionPending);
            }
            SessionState::Idle | SessionState::Ended(_) => {}
        }

        let user = ensure_user_document(self.store, &self.ctx).await?;
        if let Some(snapshot) = user.ongoing_workout {
            self.state = SessionState::PendingResume(snapshot);
            return Err(AppError::SessionPending);
        }

        let exercises = template.map(WorkoutTemplate::entries).unwrap_or_default();
        self.save_snapshot(Some(OngoingWorkoutSnapshot::new(exercises.clone(), 0)))
            .await?;

        tracing::info!(
            user = %self.ctx.user_id,
            template = template.map(|t| t.name.as_str()).unwrap_or("-"),
            "workout started"
        );
        self.state = SessionState::Active(ActiveWorkout::new(exercises, 0, self.tick));
        Ok(())
    }

    /// Continue the pending workout exactly where it was left.
    pub async fn resume(&mut self) -> AppResult<()> {
        let SessionState::PendingResume(snapshot) = &self.state else {
            return Err(AppError::NotFound("no unfinished workout to resume".into()));
        };
        let OngoingWorkoutSnapshot {
            exercises,
            elapsed_time,
        } = snapshot.clone();

        tracing::info!(user = %self.ctx.user_id, elapsed = elapsed_time, "workout resumed");
        self.state = SessionState::Active(ActiveWorkout::new(exercises, elapsed_time, self.tick));
        Ok(())
    }

    /// Save the pending workout as it was left and clear it.
    pub async fn end_pending(&mut self) -> AppResult<Workout> {
        let SessionState::PendingResume(snapshot) = &self.state else {
            return Err(AppError::NotFound("no unfinished workout to end".into()));
        };
        let snapshot = snapshot.clone();
        self.finish(snapshot).await
    }

    /// Finish the active workout: coerce the sets, save the workout, clear
    /// the snapshot. A failed save leaves the session active.
    pub async fn end(&mut self) -> AppResult<Workout> {
        let SessionState::Active(active) = &self.state else {
            return Err(AppError::NoActiveSession);
        };
        let snapshot = active.snapshot();
        self.finish(snapshot).await
    }

    /// Persist the current elapsed time without changing anything else.
    /// Returns the snapshot as written.
    pub async fn checkpoint(&self) -> AppResult<OngoingWorkoutSnapshot> {
        let SessionState::Active(active) = &self.state else {
            return Err(AppError::NoActiveSession);
        };
        let snapshot = active.snapshot();
        self.save_snapshot(Some(snapshot.clone())).await?;
        Ok(snapshot)
    }

    /// Leave the active workout for later: checkpoint it and stop the timer.
    pub async fn suspend(&mut self) -> AppResult<()> {
        let snapshot = self.checkpoint().await?;

        tracing::info!(user = %self.ctx.user_id, elapsed = snapshot.elapsed_time, "workout suspended");
        self.state = SessionState::PendingResume(snapshot);
        Ok(())
    }

    /// Append an exercise. Catalog names are normalized to their canonical
    /// spelling; anything else is remembered as a custom exercise.
    pub async fn add_exercise(&mut self, name: &str) -> AppResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("exercise name is empty".into()));
        }
        let canonical = catalog_name(name);
        let entry = ExerciseEntry::new(canonical.unwrap_or(name));

        // snapshot and custom-exercise list land in the same write
        self.mutate_with(
            |exercises| {
                exercises.push(entry);
                Ok(())
            },
            |user| {
                if canonical.is_none() && user.add_custom_exercise(name) {
                    tracing::debug!(user = %user.id, exercise = name, "custom exercise remembered");
                }
            },
        )
        .await
    }

    pub async fn add_set(&mut self, exercise: usize, weight: &str, reps: &str) -> AppResult<()> {
        let set = SetEntry::new(weight, reps);
        self.mutate(|exercises| {
            exercise_mut(exercises, exercise)?.sets.push(set);
            Ok(())
        })
        .await
    }

    pub async fn update_set(
        &mut self,
        exercise: usize,
        set: usize,
        weight: &str,
        reps: &str,
    ) -> AppResult<()> {
        self.mutate(|exercises| {
            let entry = set_mut(exercises, exercise, set)?;
            entry.weight = weight.to_string();
            entry.reps = reps.to_string();
            Ok(())
        })
        .await
    }

    pub async fn toggle_set(&mut self, exercise: usize, set: usize) -> AppResult<()> {
        self.mutate(|exercises| {
            let entry = set_mut(exercises, exercise, set)?;
            entry.completed = !entry.completed;
            Ok(())
        })
        .await
    }

    pub async fn delete_set(&mut self, exercise: usize, set: usize) -> AppResult<()> {
        self.mutate(|exercises| {
            let ex = exercise_mut(exercises, exercise)?;
            if set >= ex.sets.len() {
                return Err(no_such_set(exercise, set));
            }
            ex.sets.remove(set);
            Ok(())
        })
        .await
    }

    /// Apply `change` to a copy, write the snapshot, then commit the copy.
    async fn mutate<F>(&mut self, change: F) -> AppResult<()>
    where
        F: FnOnce(&mut Vec<ExerciseEntry>) -> AppResult<()>,
    {
        self.mutate_with(change, |_| {}).await
    }

    /// As [`mutate`](Self::mutate), with `also` applied to the user document
    /// in the same write as the snapshot.
    async fn mutate_with<F, G>(&mut self, change: F, also: G) -> AppResult<()>
    where
        F: FnOnce(&mut Vec<ExerciseEntry>) -> AppResult<()>,
        G: FnOnce(&mut UserDoc),
    {
        let SessionState::Active(active) = &self.state else {
            return Err(AppError::NoActiveSession);
        };
        let mut next = active.exercises.clone();
        change(&mut next)?;
        let snapshot = OngoingWorkoutSnapshot::new(next.clone(), active.elapsed());

        self.store
            .update_user(&self.ctx.user_id, |user| {
                user.ongoing_workout = Some(snapshot);
                also(user);
            })
            .await?;

        if let SessionState::Active(active) = &mut self.state {
            active.exercises = next;
        }
        Ok(())
    }

    /// Save a snapshot as a workout, then clear it from the user document.
    async fn finish(&mut self, snapshot: OngoingWorkoutSnapshot) -> AppResult<Workout> {
        let doc = self
            .store
            .add_workout(snapshot.to_new_workout(&self.ctx.user_id, &self.ctx.email))
            .await?;
        let id = doc.id.clone();
        let workout = Workout::from_doc(doc)
            .ok_or_else(|| AppError::Remote(format!("workout {id} was stored without a date")))?;

        tracing::info!(
            user = %self.ctx.user_id,
            workout = %workout.id,
            sets = workout.set_count(),
            duration = workout.duration,
            "workout saved"
        );

        // The workout exists from here on: the session is over even if the
        // snapshot cannot be cleared.
        self.state = SessionState::Ended(workout.clone());
        self.save_snapshot(None).await?;
        Ok(workout)
    }

    async fn save_snapshot(&self, snapshot: Option<OngoingWorkoutSnapshot>) -> AppResult<()> {
        self.store
            .update_user(&self.ctx.user_id, |user| user.ongoing_workout = snapshot)
            .await?;
        Ok(())
    }
}

fn exercise_mut(exercises: &mut [ExerciseEntry], index: usize) -> AppResult<&mut ExerciseEntry> {
    exercises
        .get_mut(index)
        .ok_or_else(|| AppError::Validation(format!("no exercise #{}", index + 1)))
}

fn set_mut(exercises: &mut [ExerciseEntry], exercise: usize, set: usize) -> AppResult<&mut SetEntry> {
    exercise_mut(exercises, exercise)?
        .sets
        .get_mut(set)
        .ok_or_else(|| no_such_set(exercise, set))
}

fn no_such_set(exercise: usize, set: usize) -> AppError {
    AppError::Validation(format!("exercise #{} has no set #{}", exercise + 1, set + 1))
}

/// What is printed after a workout is saved.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSummary {
    pub duration: String,
    pub exercise_count: usize,
    /// `"{sets} x {name}"` per exercise.
    pub lines: Vec<String>,
}

impl WorkoutSummary {
    pub fn of(workout: &Workout) -> Self {
        Self {
            duration: format_duration(workout.duration),
            exercise_count: workout.exercises.len(),
            lines: workout
                .exercises
                .iter()
                .map(|e| format!("{} x {}", e.sets.len(), e.name))
                .collect(),
        }
    }
}
