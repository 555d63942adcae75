//! Friend graph: symmetric edges stored as user ids on both user documents.

use crate::core::auth::normalize_email;
use crate::errors::{AppError, AppResult};
use crate::models::UserId;
use crate::models::user::UserDoc;
use crate::store::DocumentStore;

/// How the caller names the other party. Emails are resolved to the
/// canonical user id before anything is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FriendIdentifier {
    Id(UserId),
    Email(String),
}

impl FriendIdentifier {
    /// Anything with an `@` is an email, everything else a user id.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AppError::Validation("friend identifier is empty".into()));
        }
        if raw.contains('@') {
            Ok(Self::Email(normalize_email(raw)?))
        } else {
            Ok(Self::Id(UserId::from(raw)))
        }
    }
}

/// A friend as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendProfile {
    pub id: UserId,
    /// Empty when the friend's document no longer exists.
    pub email: String,
}

pub struct FriendGraph<'a, S: DocumentStore> {
    store: &'a S,
}

impl<'a, S: DocumentStore> FriendGraph<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    async fn lookup(&self, other: &FriendIdentifier) -> AppResult<Option<UserDoc>> {
        match other {
            FriendIdentifier::Id(id) if id.as_str().trim().is_empty() => {
                Err(AppError::Validation("friend identifier is empty".into()))
            }
            FriendIdentifier::Id(id) => self.store.get_user(id).await,
            FriendIdentifier::Email(email) if email.trim().is_empty() => {
                Err(AppError::Validation("friend identifier is empty".into()))
            }
            FriendIdentifier::Email(email) => {
                self.store.find_user_by_email(&normalize_email(email)?).await
            }
        }
    }

    /// Add a symmetric edge. Idempotent; both documents change in one
    /// transaction. Returns the friend's canonical id.
    pub async fn add_friend(&self, self_id: &UserId, other: &FriendIdentifier) -> AppResult<UserId> {
        let target = self.lookup(other).await?.ok_or_else(|| {
            AppError::NotFound(match other {
                FriendIdentifier::Id(id) => format!("no user with id {id}"),
                FriendIdentifier::Email(email) => format!("no user with email {email}"),
            })
        })?;

        if &target.id == self_id {
            return Err(AppError::Validation("you cannot add yourself as a friend".into()));
        }

        let friend_id = target.id.clone();
        self.store
            .update_user_pair(self_id, &friend_id, |me, them| {
                me.add_friend(&them.id);
                them.add_friend(&me.id);
            })
            .await?;

        tracing::info!(user = %self_id, friend = %friend_id, "friend added");
        Ok(friend_id)
    }

    /// Remove a symmetric edge. Unknown users and non-friends are a no-op.
    /// Returns the removed id, if there was an edge to remove.
    pub async fn remove_friend(
        &self,
        self_id: &UserId,
        other: &FriendIdentifier,
    ) -> AppResult<Option<UserId>> {
        let target = self.lookup(other).await?;

        let friend_id = match (&target, other) {
            (Some(user), _) => user.id.clone(),
            (None, FriendIdentifier::Id(id)) => id.clone(),
            (None, FriendIdentifier::Email(_)) => return Ok(None),
        };

        let me = self
            .store
            .get_user(self_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {self_id}")))?;

        let listed_by_them = target.as_ref().is_some_and(|t| t.has_friend(self_id));
        if !me.has_friend(&friend_id) && !listed_by_them {
            return Ok(None);
        }

        if target.is_some() {
            self.store
                .update_user_pair(self_id, &friend_id, |me, them| {
                    me.remove_friend(&them.id);
                    them.remove_friend(&me.id);
                })
                .await?;
        } else {
            // The other document is gone; drop the dangling id on our side.
            self.store
                .update_user(self_id, |me| {
                    me.remove_friend(&friend_id);
                })
                .await?;
        }

        tracing::info!(user = %self_id, friend = %friend_id, "friend removed");
        Ok(Some(friend_id))
    }

    /// Friend ids of `user_id`; empty if the user has none (or no document).
    pub async fn list_friends(&self, user_id: &UserId) -> AppResult<Vec<UserId>> {
        Ok(self
            .store
            .get_user(user_id)
            .await?
            .map(|u| u.friends)
            .unwrap_or_default())
    }

    pub async fn friend_profiles(&self, user_id: &UserId) -> AppResult<Vec<FriendProfile>> {
        let mut out = Vec::new();
        for id in self.list_friends(user_id).await? {
            let email = self
                .store
                .get_user(&id)
                .await?
                .map(|u| u.email)
                .unwrap_or_default();
            out.push(FriendProfile { id, email });
        }
        Ok(out)
    }
}
