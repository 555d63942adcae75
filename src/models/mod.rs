//! Domain documents: users, workouts, templates and the in-flight snapshot.

pub mod catalog;
pub mod snapshot;
pub mod template;
pub mod user;
pub mod workout;

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! document_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Fresh random id, the way the document store assigns them.
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().simple().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

document_id!(
    /// Opaque identity assigned by the identity provider (`users/{userId}`).
    UserId
);
document_id!(
    /// `workouts/{workoutId}`
    WorkoutId
);
document_id!(
    /// `users/{userId}/templates/{templateId}`
    TemplateId
);
