use super::workout::{ExerciseEntry, NewWorkout};
use super::UserId;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// In-progress workout persisted on the user record (`ongoingWorkout`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OngoingWorkoutSnapshot {
    #[serde(default)]
    pub exercises: Vec<ExerciseEntry>,
    #[serde(default)]
    pub elapsed_time: u64,
}

impl OngoingWorkoutSnapshot {
    pub fn new(exercises: Vec<ExerciseEntry>, elapsed_time: u64) -> Self {
        Self {
            exercises,
            elapsed_time,
        }
    }

    pub fn set_count(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }

    /// Finalized workout payload: raw set input coerced to numbers.
    pub fn to_new_workout(&self, user_id: &UserId, user_email: &str) -> NewWorkout {
        NewWorkout {
            user_id: user_id.clone(),
            user_email: user_email.to_string(),
            exercises: self.exercises.iter().map(ExerciseEntry::finalize).collect(),
            duration: self.elapsed_time,
            date: Utc::now().to_rfc3339(),
        }
    }
}
