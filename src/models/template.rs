use super::TemplateId;
use super::workout::ExerciseEntry;
use serde::Serialize;

/// Reusable blueprint: exercise names only, no sets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutTemplate {
    pub id: TemplateId,
    pub name: String,
    pub exercises: Vec<String>,
}

impl WorkoutTemplate {
    /// Exercises to start a session with (empty set lists).
    pub fn entries(&self) -> Vec<ExerciseEntry> {
        self.exercises.iter().map(ExerciseEntry::new).collect()
    }
}
