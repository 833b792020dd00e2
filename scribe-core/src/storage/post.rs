//! Post - the stored record.
//!
//! TigerStyle: explicit types for each write path. `NewPost` for inserts,
//! `PostPatch` for partial updates, `Post` for everything read back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{StoreError, StoreResult};

// =============================================================================
// Post
// =============================================================================

/// A post as stored and returned by every backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Unique, immutable identifier derived from the title at creation
    pub slug: String,
    /// Display title (non-empty)
    pub title: String,
    /// Short summary
    pub summary: String,
    /// Body text
    pub content: String,
    /// Optional ordered tags
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Visibility flag
    #[serde(default = "published_default")]
    pub published: bool,
    /// Creation timestamp, never changed
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

pub(crate) fn published_default() -> bool {
    true
}

/// Title, summary and content must be non-empty on every write path.
pub(crate) fn require_field(field: &str, value: &str) -> StoreResult<()> {
    if value.is_empty() {
        return Err(StoreError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Post {
    /// Build a freshly inserted post from its payload, stamped at `now`.
    #[must_use]
    pub fn from_new(new: NewPost, now: DateTime<Utc>) -> Self {
        Self {
            slug: new.slug,
            title: new.title,
            summary: new.summary,
            content: new.content,
            tags: None,
            published: true,
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// NewPost
// =============================================================================

/// Insert payload. Timestamps are assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    /// Already-derived slug
    pub slug: String,
    /// Title
    pub title: String,
    /// Summary
    pub summary: String,
    /// Content
    pub content: String,
}

// =============================================================================
// PostPatch
// =============================================================================

/// Update to an optional field, distinguishing "leave alone" from "clear".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldUpdate<T> {
    /// Field not supplied; keep the stored value.
    #[default]
    Keep,
    /// Remove the stored value.
    Clear,
    /// Replace the stored value.
    Set(T),
}

impl<T> FieldUpdate<T> {
    fn apply_to(self, slot: &mut Option<T>) {
        match self {
            Self::Keep => {}
            Self::Clear => *slot = None,
            Self::Set(value) => *slot = Some(value),
        }
    }
}

/// Partial update. Only supplied fields are merged; `slug` and `created_at`
/// are not representable here and so can never change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostPatch {
    /// New title
    pub title: Option<String>,
    /// New summary
    pub summary: Option<String>,
    /// New content
    pub content: Option<String>,
    /// Tag change
    pub tags: FieldUpdate<Vec<String>>,
    /// New visibility
    pub published: Option<bool>,
}

impl PostPatch {
    /// Patch that changes only the title.
    #[must_use]
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Patch that changes only the summary.
    #[must_use]
    pub fn summary(summary: impl Into<String>) -> Self {
        Self {
            summary: Some(summary.into()),
            ..Self::default()
        }
    }

    /// Patch that changes only the content.
    #[must_use]
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// True if no field is supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.summary.is_none()
            && self.content.is_none()
            && self.tags == FieldUpdate::Keep
            && self.published.is_none()
    }

    /// Reject patches that would break a record invariant.
    ///
    /// # Errors
    /// Returns `Validation` if the patch sets an empty title, summary or
    /// content.
    pub fn validate(&self) -> StoreResult<()> {
        for (field, value) in [
            ("title", &self.title),
            ("summary", &self.summary),
            ("content", &self.content),
        ] {
            if let Some(value) = value {
                require_field(field, value)?;
            }
        }
        Ok(())
    }

    /// Merge this patch into `post` and refresh `updated_at`.
    ///
    /// `updated_at` never moves before `created_at`, even if `now` does.
    pub fn apply(self, post: &mut Post, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(summary) = self.summary {
            post.summary = summary;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
        self.tags.apply_to(&mut post.tags);
        if let Some(published) = self.published {
            post.published = published;
        }
        post.updated_at = now.max(post.created_at);

        // Postcondition
        assert!(post.created_at <= post.updated_at, "created_at must not exceed updated_at");
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().unwrap()
    }

    fn sample() -> Post {
        Post::from_new(
            NewPost {
                slug: "hello-world".to_string(),
                title: "Hello, World!".to_string(),
                summary: "s".to_string(),
                content: "c".to_string(),
            },
            at(10),
        )
    }

    #[test]
    fn test_from_new_defaults() {
        let post = sample();
        assert!(post.published);
        assert!(post.tags.is_none());
        assert_eq!(post.created_at, post.updated_at);
    }

    #[test]
    fn test_patch_changes_only_supplied_fields() {
        let mut post = sample();
        PostPatch::summary("x").apply(&mut post, at(20));

        assert_eq!(post.summary, "x");
        assert_eq!(post.title, "Hello, World!");
        assert_eq!(post.content, "c");
        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.created_at, at(10));
        assert_eq!(post.updated_at, at(20));
    }

    #[test]
    fn test_patch_tags_keep_clear_set() {
        let mut post = sample();
        let set = PostPatch {
            tags: FieldUpdate::Set(vec!["rust".to_string()]),
            ..PostPatch::default()
        };
        set.apply(&mut post, at(11));
        assert_eq!(post.tags, Some(vec!["rust".to_string()]));

        PostPatch::content("new").apply(&mut post, at(12));
        assert_eq!(post.tags, Some(vec!["rust".to_string()]));

        let clear = PostPatch {
            tags: FieldUpdate::Clear,
            ..PostPatch::default()
        };
        clear.apply(&mut post, at(13));
        assert!(post.tags.is_none());
    }

    #[test]
    fn test_patch_clock_behind_created_at() {
        let mut post = sample();
        PostPatch::title("Later").apply(&mut post, at(5));
        assert_eq!(post.updated_at, post.created_at);
    }

    #[test]
    fn test_patch_validate_empty_fields() {
        assert!(PostPatch::title("").validate().is_err());
        assert!(PostPatch::summary("").validate().is_err());
        assert!(PostPatch::content("").validate().is_err());
        assert!(PostPatch::title("ok").validate().is_ok());
        assert!(PostPatch::summary("  ").validate().is_ok());
        assert!(PostPatch::default().validate().is_ok());
        assert!(PostPatch::default().is_empty());
    }

    #[test]
    fn test_post_json_defaults() {
        let json = r#"{
            "slug": "a", "title": "A", "summary": "s", "content": "c",
            "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert!(post.published);
        assert!(post.tags.is_none());
    }
}
