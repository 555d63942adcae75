//! Social feed: my workouts and my friends', out of a recent global window.

use crate::core::friends::FriendGraph;
use crate::errors::AppResult;
use crate::models::UserId;
use crate::models::workout::Workout;
use crate::store::DocumentStore;
use std::collections::HashSet;

/// Size of the global recency window scanned for the feed.
pub const DEFAULT_FEED_WINDOW: usize = 50;

pub struct FeedResolver<'a, S: DocumentStore> {
    store: &'a S,
    window: usize,
}

impl<'a, S: DocumentStore> FeedResolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            window: DEFAULT_FEED_WINDOW,
        }
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Workouts by `user_id` or a friend, in the store's recency order
    /// (server timestamp, newest first; documents without one come last and
    /// are not reordered by their client date).
    ///
    /// Only the `window` most recent workouts of *all* users are scanned and
    /// filtered here. Relevant workouts older than that window are not
    /// returned, even if fewer than `window` results come back.
    pub async fn visible_workouts(&self, user_id: &UserId) -> AppResult<Vec<Workout>> {
        let mut visible: HashSet<UserId> = FriendGraph::new(self.store)
            .list_friends(user_id)
            .await?
            .into_iter()
            .collect();
        visible.insert(user_id.clone());

        let recent = self.store.recent_workouts(self.window).await?;
        let scanned = recent.len();

        let mut out = Vec::new();
        for doc in recent {
            if !visible.contains(&doc.user_id) {
                continue;
            }
            let id = doc.id.clone();
            match Workout::from_doc(doc) {
                Some(w) => out.push(w),
                None => tracing::warn!(workout = %id, "skipping workout without a usable timestamp"),
            }
        }

        tracing::debug!(user = %user_id, scanned, visible = out.len(), "feed resolved");
        Ok(out)
    }
}
