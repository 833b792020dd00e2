//! ContentStore - the only entry point callers use.
//!
//! TigerStyle: derive identity here, store it there. The store holds no
//! cached copy of any post between calls; the backend owns every record.

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::slug;
use crate::storage::{
    require_field, NewPost, Post, PostPatch, StorageBackend, StoreError, StoreResult,
};

/// Demo posts installed by [`ContentStore::seed_if_empty`]: (title, summary, content).
const SEED_POSTS: &[(&str, &str, &str)] = &[
    (
        "Hello, world",
        "A first post so the blog is not empty.",
        "This post was created when the store was seeded on first start.",
    ),
    (
        "Notes on a minimal metrics pipeline",
        "Streaming ingest, a table format, and a dashboard.",
        "Design trade-offs around checkpoints and dashboarding.",
    ),
];

/// Orchestrates slug derivation over an injected storage backend.
#[derive(Clone)]
pub struct ContentStore {
    backend: Arc<dyn StorageBackend>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStore")
            .field("backend", &self.backend.name())
            .finish_non_exhaustive()
    }
}

impl ContentStore {
    /// Create a store over `backend`.
    #[must_use]
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self::with_clock(backend, Arc::new(SystemClock))
    }

    /// Create a store with an explicit clock (used to default restore timestamps).
    #[must_use]
    pub fn with_clock(backend: Arc<dyn StorageBackend>, clock: Arc<dyn Clock>) -> Self {
        Self { backend, clock }
    }

    /// The active backend.
    #[must_use]
    pub fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    pub(crate) fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Create a post, deriving its slug from `title`.
    ///
    /// # Errors
    /// - `Validation` if the title derives to an empty slug, or summary or
    ///   content is empty
    /// - `Conflict` if the derived slug already exists
    pub async fn create(&self, title: &str, summary: &str, content: &str) -> StoreResult<Post> {
        require_field("summary", summary)?;
        require_field("content", content)?;

        let slug = slug::derive(title);
        if slug.is_empty() {
            return Err(StoreError::validation(
                "title must contain at least one letter or digit",
            ));
        }

        let post = self
            .backend
            .insert(NewPost {
                slug,
                title: title.to_string(),
                summary: summary.to_string(),
                content: content.to_string(),
            })
            .await?;

        tracing::info!(slug = %post.slug, backend = self.backend.name(), "Created post");
        Ok(post)
    }

    /// Read a post by slug.
    ///
    /// # Errors
    /// `NotFound` if absent.
    pub async fn read(&self, slug: &str) -> StoreResult<Post> {
        self.backend.get(slug).await
    }

    /// Apply a partial update. Slug and `created_at` never change.
    ///
    /// # Errors
    /// - `Validation` if the patch empties title, summary or content
    /// - `NotFound` if absent
    pub async fn update(&self, slug: &str, patch: PostPatch) -> StoreResult<Post> {
        patch.validate()?;
        let post = self.backend.update(slug, patch).await?;
        tracing::info!(slug = %post.slug, "Updated post");
        Ok(post)
    }

    /// Delete a post.
    ///
    /// # Errors
    /// `NotFound` if absent.
    pub async fn delete(&self, slug: &str) -> StoreResult<()> {
        self.backend.delete(slug).await?;
        tracing::info!(slug = slug, "Deleted post");
        Ok(())
    }

    /// All posts, newest first.
    ///
    /// # Errors
    /// `Unavailable` if the medium cannot be read.
    pub async fn list(&self) -> StoreResult<Vec<Post>> {
        self.backend.list().await
    }

    /// Create the demo posts if the store is empty.
    ///
    /// Returns the number of posts created; a non-empty store is untouched.
    ///
    /// # Errors
    /// Propagates any error from `list` or `create`.
    pub async fn seed_if_empty(&self) -> StoreResult<usize> {
        if !self.list().await?.is_empty() {
            tracing::debug!("Store not empty, skipping seed");
            return Ok(0);
        }

        for (title, summary, content) in SEED_POSTS {
            self.create(title, summary, content).await?;
        }
        tracing::info!(count = SEED_POSTS.len(), "Seeded demo posts");
        Ok(SEED_POSTS.len())
    }
}

// =============================================================================
// Tests
// =============================================================================
