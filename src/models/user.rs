use super::UserId;
use super::snapshot::OngoingWorkoutSnapshot;
use chrono::{DateTime, Utc};

/// `users/{userId}` document.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDoc {
    pub id: UserId,
    pub email: String,
    /// Canonical friend identifiers (user ids), no duplicates.
    pub friends: Vec<UserId>,
    pub custom_exercises: Vec<String>,
    pub ongoing_workout: Option<OngoingWorkoutSnapshot>,
    pub created_at: DateTime<Utc>,
}

impl UserDoc {
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            friends: Vec::new(),
            custom_exercises: Vec::new(),
            ongoing_workout: None,
            created_at: Utc::now(),
        }
    }

    pub fn has_friend(&self, id: &UserId) -> bool {
        self.friends.contains(id)
    }

    /// Set-union insert. Returns false if already present.
    pub fn add_friend(&mut self, id: &UserId) -> bool {
        if self.has_friend(id) {
            return false;
        }
        self.friends.push(id.clone());
        true
    }

    /// Returns false if `id` was not a friend.
    pub fn remove_friend(&mut self, id: &UserId) -> bool {
        let before = self.friends.len();
        self.friends.retain(|f| f != id);
        before != self.friends.len()
    }

    pub fn add_custom_exercise(&mut self, name: &str) -> bool {
        if self.custom_exercises.iter().any(|e| e == name) {
            return false;
        }
        self.custom_exercises.push(name.to_string());
        true
    }
}

/// The signed-in identity, passed explicitly to every service that needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: UserId,
    pub email: String,
}
