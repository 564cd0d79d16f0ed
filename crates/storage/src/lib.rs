use chrono::{DateTime, Utc};
use std::collections::HashSet;

use shared::{
    domain::{Post, PostDraft, PostId, SortKey},
    error::NotesResult,
};

pub mod config;
pub mod kv;

pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};

pub const DEFAULT_STORAGE_KEY: &str = "posts";

/// Ordered post list mirrored wholesale into one key of a [`KeyValueStore`].
///
/// The list is kept most-recent-first by insertion. Every successful mutation rewrites the
/// full snapshot. The plain mutators log a failed write and keep the in-memory change; the
/// `try_` variants keep the change too but hand the write error back to the caller.
#[derive(Debug)]
pub struct PostStore<S> {
    backend: S,
    key: String,
    posts: Vec<Post>,
}

impl<S: KeyValueStore> PostStore<S> {
    /// Reads the snapshot under `key`. Missing, unreadable or malformed data starts an empty list.
    pub fn load(backend: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let posts = match backend.get_string(&key) {
            Ok(Some(raw)) => match decode_snapshot(&raw) {
                Ok(posts) => {
                    tracing::info!(key = %key, count = posts.len(), "loaded post snapshot");
                    posts
                }
                Err(err) => {
                    tracing::warn!(key = %key, error = %err, "discarding malformed post snapshot");
                    Vec::new()
                }
            },
            Ok(None) => {
                tracing::debug!(key = %key, "no post snapshot stored yet");
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "post snapshot unreadable; starting empty");
                Vec::new()
            }
        };

        Self {
            backend,
            key,
            posts,
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Posts in stored order (newest insertion first).
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn get(&self, id: &PostId) -> Option<&Post> {
        self.posts.iter().find(|post| &post.id == id)
    }

    pub fn create(&mut self, draft: PostDraft) -> &Post {
        self.create_at(draft, Utc::now())
    }

    pub fn create_at(&mut self, draft: PostDraft, timestamp: DateTime<Utc>) -> &Post {
        self.insert_post(draft, timestamp);
        self.persist_best_effort();
        &self.posts[0]
    }

    /// Like [`Self::create`], but a failed write is returned instead of logged.
    pub fn try_create(&mut self, draft: PostDraft) -> NotesResult<&Post> {
        self.insert_post(draft, Utc::now());
        self.persist()?;
        Ok(&self.posts[0])
    }

    /// Returns `false` without touching the list or the backend when `id` is unknown.
    pub fn update(&mut self, id: &PostId, draft: PostDraft) -> bool {
        let updated = self.apply_update(id, draft);
        if updated {
            self.persist_best_effort();
        }
        updated
    }

    pub fn try_update(&mut self, id: &PostId, draft: PostDraft) -> NotesResult<bool> {
        if !self.apply_update(id, draft) {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    pub fn delete(&mut self, id: &PostId) -> Option<Post> {
        let removed = self.remove_post(id)?;
        self.persist_best_effort();
        Some(removed)
    }

    pub fn try_delete(&mut self, id: &PostId) -> NotesResult<Option<Post>> {
        let Some(removed) = self.remove_post(id) else {
            return Ok(None);
        };
        self.persist()?;
        Ok(Some(removed))
    }

    pub fn list(&self, author_filter: &str, sort: SortKey) -> Vec<Post> {
        project(&self.posts, author_filter, sort)
    }

    /// Swaps in an imported snapshot. Later duplicates of an id are dropped.
    pub fn replace_all(&mut self, posts: Vec<Post>) -> usize {
        self.swap_posts(posts);
        self.persist_best_effort();
        self.posts.len()
    }

    pub fn try_replace_all(&mut self, posts: Vec<Post>) -> NotesResult<usize> {
        self.swap_posts(posts);
        self.persist()?;
        Ok(self.posts.len())
    }

    pub fn clear(&mut self) {
        self.swap_posts(Vec::new());
        self.persist_best_effort();
    }

    pub fn try_clear(&mut self) -> NotesResult<()> {
        self.swap_posts(Vec::new());
        self.persist()
    }

    pub fn persist(&mut self) -> NotesResult<()> {
        let serialized = encode_snapshot(&self.posts)?;
        self.backend.set_string(&self.key, serialized)
    }

    fn insert_post(&mut self, draft: PostDraft, timestamp: DateTime<Utc>) {
        let post = Post::from_draft(draft, timestamp);
        tracing::debug!(post_id = %post.id, "created post");
        self.posts.insert(0, post);
    }

    fn apply_update(&mut self, id: &PostId, draft: PostDraft) -> bool {
        let Some(post) = self.posts.iter_mut().find(|post| &post.id == id) else {
            tracing::debug!(post_id = %id, "update skipped; no such post");
            return false;
        };

        post.apply_draft(draft);
        tracing::debug!(post_id = %id, "updated post");
        true
    }

    fn remove_post(&mut self, id: &PostId) -> Option<Post> {
        let Some(index) = self.posts.iter().position(|post| &post.id == id) else {
            tracing::debug!(post_id = %id, "delete skipped; no such post");
            return None;
        };

        tracing::debug!(post_id = %id, "deleted post");
        Some(self.posts.remove(index))
    }

    fn swap_posts(&mut self, posts: Vec<Post>) {
        self.posts = dedupe_ids(posts);
        tracing::info!(key = %self.key, count = self.posts.len(), "replaced post snapshot");
    }

    fn persist_best_effort(&mut self) {
        if let Err(err) = self.persist() {
            tracing::warn!(key = %self.key, error = %err, "failed to persist post snapshot");
        }
    }
}

/// Filters by author substring (case-insensitive, empty = all), then orders by `sort`.
/// Authors compare case-insensitively, with exact case only breaking ties. Both orders are
/// stable, so remaining ties keep stored order.
pub fn project(posts: &[Post], author_filter: &str, sort: SortKey) -> Vec<Post> {
    let mut visible: Vec<Post> = posts
        .iter()
        .filter(|post| post.author_matches(author_filter))
        .cloned()
        .collect();

    match sort {
        SortKey::Author => visible.sort_by(|a, b| {
            a.author
                .to_lowercase()
                .cmp(&b.author.to_lowercase())
                .then_with(|| a.author.cmp(&b.author))
        }),
        SortKey::Newest => visible.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
    }

    visible
}

pub fn encode_snapshot(posts: &[Post]) -> NotesResult<String> {
    Ok(serde_json::to_string(posts)?)
}

pub fn decode_snapshot(raw: &str) -> NotesResult<Vec<Post>> {
    let posts: Vec<Post> = serde_json::from_str(raw)?;
    Ok(dedupe_ids(posts))
}

fn dedupe_ids(posts: Vec<Post>) -> Vec<Post> {
    let mut seen = HashSet::with_capacity(posts.len());
    let before = posts.len();
    let unique: Vec<Post> = posts
        .into_iter()
        .filter(|post| seen.insert(post.id.clone()))
        .collect();
    if unique.len() != before {
        tracing::warn!(
            dropped = before - unique.len(),
            "dropped posts with duplicate ids"
        );
    }
    unique
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
