//! Storage Backend Trait
//!
//! TigerStyle: Abstract interface for post storage.
//!
//! Both implementations must satisfy the same contract; the only permitted
//! difference is cross-process concurrency (see [`super::FileBackend`]).

use async_trait::async_trait;

use super::error::StoreResult;
use super::post::{NewPost, Post, PostPatch};

/// Durable storage of posts keyed by slug.
///
/// TigerStyle: All operations are async, return explicit errors.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Short name of the medium, for logs.
    fn name(&self) -> &'static str;

    /// All posts, `created_at` descending, ties in insertion order.
    ///
    /// Returns an empty list when nothing is stored.
    async fn list(&self) -> StoreResult<Vec<Post>>;

    /// Get a post by slug.
    ///
    /// Fails with `NotFound` if absent.
    async fn get(&self, slug: &str) -> StoreResult<Post>;

    /// Insert a new post, stamping `created_at` and `updated_at`.
    ///
    /// Fails with `Conflict` if the slug is already present.
    async fn insert(&self, post: NewPost) -> StoreResult<Post>;

    /// Merge a partial update and refresh `updated_at`.
    ///
    /// Fails with `NotFound` if absent.
    async fn update(&self, slug: &str, patch: PostPatch) -> StoreResult<Post>;

    /// Delete a post by slug.
    ///
    /// Fails with `NotFound` if absent.
    async fn delete(&self, slug: &str) -> StoreResult<()>;

    /// Atomically replace the whole collection with `posts`.
    ///
    /// Either every record is installed or the prior state is untouched.
    /// Callers guarantee slugs in `posts` are unique.
    async fn replace_all(&self, posts: Vec<Post>) -> StoreResult<()>;
}
