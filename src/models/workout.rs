use super::{UserId, WorkoutId};
use crate::utils::date::parse_iso_instant;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::LazyLock;

static LEADING_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("static regex"));

static LEADING_INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[+-]?\d+").expect("static regex"));

/// Coerce raw weight input to lbs.
///
/// The longest numeric prefix is used ("135lbs" → 135). Empty, malformed,
/// negative or non-finite input yields 0.
pub fn coerce_weight(raw: &str) -> f64 {
    LEADING_DECIMAL
        .find(raw.trim())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|w| w.is_finite() && *w > 0.0)
        .unwrap_or(0.0)
}

/// Coerce raw reps input to a count. Fractions are truncated ("5.5" → 5).
pub fn coerce_reps(raw: &str) -> u32 {
    LEADING_INTEGER
        .find(raw.trim())
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .map(|r| r.clamp(0, u32::MAX as i64) as u32)
        .unwrap_or(0)
}

/// A finished set as stored with a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub weight: f64,
    pub reps: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    #[serde(default)]
    pub sets: Vec<WorkoutSet>,
}

impl Exercise {
    /// Total lbs moved (weight × reps over all sets).
    pub fn volume(&self) -> f64 {
        self.sets.iter().map(|s| s.weight * s.reps as f64).sum()
    }
}

/// A set while the workout is still running: raw input as typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
    #[serde(default, deserialize_with = "string_or_number")]
    pub weight: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub reps: String,
    #[serde(default)]
    pub completed: bool,
}

impl SetEntry {
    pub fn new(weight: impl Into<String>, reps: impl Into<String>) -> Self {
        Self {
            weight: weight.into(),
            reps: reps.into(),
            completed: false,
        }
    }

    pub fn finalize(&self) -> WorkoutSet {
        WorkoutSet {
            weight: coerce_weight(&self.weight),
            reps: coerce_reps(&self.reps),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub name: String,
    #[serde(default)]
    pub sets: Vec<SetEntry>,
}

impl ExerciseEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sets: Vec::new(),
        }
    }

    pub fn finalize(&self) -> Exercise {
        Exercise {
            name: self.name.clone(),
            sets: self.sets.iter().map(SetEntry::finalize).collect(),
        }
    }
}

/// Older snapshots stored numbers where newer ones store the raw text.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// Payload for `workouts/{id}` before the store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkout {
    pub user_id: UserId,
    pub user_email: String,
    pub exercises: Vec<Exercise>,
    pub duration: u64,
    /// Client-side ISO string.
    pub date: String,
}

/// A stored workout document, as read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutDoc {
    pub id: WorkoutId,
    pub user_id: UserId,
    pub user_email: String,
    pub exercises: Vec<Exercise>,
    pub duration: u64,
    /// Server-assigned; absent on documents written before the store set it.
    pub timestamp: Option<DateTime<Utc>>,
    pub date: String,
}

/// A workout with its time normalized to a single instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workout {
    pub id: WorkoutId,
    pub user_id: UserId,
    pub user_email: String,
    pub exercises: Vec<Exercise>,
    pub duration: u64,
    pub performed_at: DateTime<Utc>,
}

impl Workout {
    /// Server timestamp if present, else the client ISO date.
    /// `None` when neither is usable.
    pub fn from_doc(doc: WorkoutDoc) -> Option<Self> {
        let performed_at = doc.timestamp.or_else(|| parse_iso_instant(&doc.date))?;
        Some(Self {
            id: doc.id,
            user_id: doc.user_id,
            user_email: doc.user_email,
            exercises: doc.exercises,
            duration: doc.duration,
            performed_at,
        })
    }

    pub fn set_count(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }

    pub fn volume(&self) -> f64 {
        self.exercises.iter().map(Exercise::volume).sum()
    }
}
