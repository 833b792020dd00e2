//! Backup and restore.
//!
//! `backup` is a full, unpaginated snapshot. `restore` destructively replaces
//! the whole store with a supplied snapshot in one atomic step. Slugs are
//! taken verbatim from the snapshot, never re-derived from titles.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::storage::{published_default, Post, StoreError, StoreResult};
use crate::store::ContentStore;

/// One post in a restore payload.
///
/// Timestamps are optional so hand-written snapshots can be restored; a
/// missing `created_at`/`updated_at` defaults to the restore time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreRecord {
    /// Slug, installed as given
    pub slug: String,
    /// Title
    pub title: String,
    /// Summary
    pub summary: String,
    /// Content
    pub content: String,
    /// Optional tags
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Visibility, default true
    #[serde(default = "published_default")]
    pub published: bool,
    /// Creation time from the snapshot
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Update time from the snapshot
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Post> for RestoreRecord {
    fn from(post: Post) -> Self {
        Self {
            slug: post.slug,
            title: post.title,
            summary: post.summary,
            content: post.content,
            tags: post.tags,
            published: post.published,
            created_at: Some(post.created_at),
            updated_at: Some(post.updated_at),
        }
    }
}

impl RestoreRecord {
    /// Check required fields.
    ///
    /// # Errors
    /// `Validation` naming the first empty required field.
    pub fn validate(&self) -> StoreResult<()> {
        for (field, value) in [
            ("slug", &self.slug),
            ("title", &self.title),
            ("summary", &self.summary),
            ("content", &self.content),
        ] {
            if value.is_empty() {
                return Err(StoreError::validation(format!(
                    "restore record {:?} has empty {field}",
                    self.slug
                )));
            }
        }
        Ok(())
    }

    fn into_post(self, now: DateTime<Utc>) -> Post {
        let created_at = self.created_at.unwrap_or(now);
        let updated_at = self.updated_at.unwrap_or(now).max(created_at);
        Post {
            slug: self.slug,
            title: self.title,
            summary: self.summary,
            content: self.content,
            tags: self.tags,
            published: self.published,
            created_at,
            updated_at,
        }
    }
}

impl ContentStore {
    /// Full snapshot, identical to `list`.
    ///
    /// # Errors
    /// `Unavailable` if the medium cannot be read.
    pub async fn backup(&self) -> StoreResult<Vec<Post>> {
        let posts = self.list().await?;
        tracing::info!(count = posts.len(), "Backed up posts");
        Ok(posts)
    }

    /// Replace the entire store with `records`. Returns the count installed.
    ///
    /// Every record is validated before storage is touched; nothing is
    /// installed unless everything is.
    ///
    /// # Errors
    /// - `Validation` if any record has an empty required field or two
    ///   records share a slug
    /// - `Unavailable` if the medium fails (prior state is kept)
    pub async fn restore(&self, records: Vec<RestoreRecord>) -> StoreResult<usize> {
        {
            let mut seen = HashSet::with_capacity(records.len());
            for record in &records {
                record.validate()?;
                if !seen.insert(record.slug.as_str()) {
                    return Err(StoreError::validation(format!(
                        "duplicate slug in restore: {}",
                        record.slug
                    )));
                }
            }
        }

        let now = self.clock().now();
        let posts: Vec<Post> = records.into_iter().map(|r| r.into_post(now)).collect();
        let count = posts.len();

        self.backend().replace_all(posts).await?;

        tracing::info!(count = count, backend = self.backend().name(), "Restored posts");
        Ok(count)
    }
}

// =============================================================================
// Tests
// =============================================================================
