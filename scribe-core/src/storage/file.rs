//! FileBackend - Single-Artifact Storage
//!
//! TigerStyle: the whole collection lives in one JSON array. Every operation
//! reads the full artifact, changes it in memory, and rewrites it completely.
//!
//! # Concurrency
//!
//! Within one process every mutation is serialized behind a single mutex, so
//! two racing inserts of the same slug resolve to exactly one `Conflict`.
//! There is no cross-process coordination: two processes writing the same
//! artifact can lose updates (last rewrite wins). Run one writer process.
//!
//! # Atomicity
//!
//! Rewrites go to a sibling temp file which is then renamed over the
//! artifact, so readers and crashes observe either the old or the new
//! collection, never a torn one.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::backend::StorageBackend;
use super::error::{StoreError, StoreResult};
use super::post::{NewPost, Post, PostPatch};
use crate::clock::{Clock, SystemClock};

/// Suffix of the temp file used for atomic rewrites.
const TEMP_FILE_SUFFIX: &str = ".tmp";

/// File-backed storage for single-process deployments.
#[derive(Debug)]
pub struct FileBackend {
    /// Artifact path
    path: PathBuf,
    /// Timestamp source
    clock: Arc<dyn Clock>,
    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileBackend {
    /// Open (or lazily create) the artifact at `path`.
    ///
    /// The parent directory is created eagerly so an unwritable location
    /// surfaces here rather than on first write.
    ///
    /// # Errors
    /// Returns `Unavailable` if `path` does not name a file, the directory
    /// cannot be created, or the existing artifact is not a valid post array.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        Self::open_with_clock(path, Arc::new(SystemClock)).await
    }

    /// Open with an explicit clock.
    ///
    /// # Errors
    /// See [`FileBackend::open`].
    pub async fn open_with_clock(
        path: impl Into<PathBuf>,
        clock: Arc<dyn Clock>,
    ) -> StoreResult<Self> {
        let path = path.into();
        if path.file_name().is_none() {
            return Err(StoreError::unavailable(format!(
                "file backend path must name a file, got {}",
                path.display()
            )));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                StoreError::unavailable_with(
                    format!("cannot create data directory {}: {e}", parent.display()),
                    e,
                )
            })?;
        }

        let backend = Self {
            path,
            clock,
            write_lock: Mutex::new(()),
        };

        // Fail fast on a corrupt artifact.
        let existing = backend.load().await?;
        tracing::info!(
            path = %backend.path.display(),
            posts = existing.len(),
            "Opened file backend"
        );

        Ok(backend)
    }

    /// Artifact path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full collection in insertion order.
    async fn load(&self) -> StoreResult<Vec<Post>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::unavailable_with(
                    format!("cannot read {}: {e}", self.path.display()),
                    e,
                ))
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            StoreError::unavailable_with(
                format!("corrupt post file {}: {e}", self.path.display()),
                e,
            )
        })
    }

    /// Rewrite the full collection atomically.
    async fn save(&self, posts: &[Post]) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(posts)?;

        let mut temp_name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        temp_name.push(TEMP_FILE_SUFFIX);
        let temp_path = self.path.with_file_name(temp_name);

        if let Err(e) = write_then_rename(&temp_path, &self.path, &bytes).await {
            if let Err(cleanup) = fs::remove_file(&temp_path).await {
                tracing::debug!(path = %temp_path.display(), error = %cleanup, "Temp file not removed");
            }
            return Err(StoreError::unavailable_with(
                format!("cannot write {}: {e}", self.path.display()),
                e,
            ));
        }

        Ok(())
    }
}

async fn write_then_rename(temp_path: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(temp_path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);
    fs::rename(temp_path, path).await
}

/// Sort newest first. `sort_by` is stable, so ties keep insertion order.
fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

// =============================================================================
// StorageBackend Implementation
// =============================================================================

#[async_trait]
impl StorageBackend for FileBackend {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn list(&self) -> StoreResult<Vec<Post>> {
        let mut posts = self.load().await?;
        sort_newest_first(&mut posts);
        Ok(posts)
    }

    async fn get(&self, slug: &str) -> StoreResult<Post> {
        self.load()
            .await?
            .into_iter()
            .find(|p| p.slug == slug)
            .ok_or_else(|| StoreError::not_found(slug))
    }

    async fn insert(&self, post: NewPost) -> StoreResult<Post> {
        // Precondition
        assert!(!post.slug.is_empty(), "post must have slug");

        let _guard = self.write_lock.lock().await;
        let mut posts = self.load().await?;
        if posts.iter().any(|p| p.slug == post.slug) {
            return Err(StoreError::conflict(post.slug));
        }

        let post = Post::from_new(post, self.clock.now());
        posts.push(post.clone());
        self.save(&posts).await?;

        Ok(post)
    }

    async fn update(&self, slug: &str, patch: PostPatch) -> StoreResult<Post> {
        let _guard = self.write_lock.lock().await;
        let mut posts = self.load().await?;
        let post = posts
            .iter_mut()
            .find(|p| p.slug == slug)
            .ok_or_else(|| StoreError::not_found(slug))?;

        patch.apply(post, self.clock.now());
        let updated = post.clone();
        self.save(&posts).await?;

        Ok(updated)
    }

    async fn delete(&self, slug: &str) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut posts = self.load().await?;
        let len_before = posts.len();
        posts.retain(|p| p.slug != slug);
        if posts.len() == len_before {
            return Err(StoreError::not_found(slug));
        }
        self.save(&posts).await
    }

    async fn replace_all(&self, posts: Vec<Post>) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        self.save(&posts).await
    }
}

// =============================================================================
// Tests
// =============================================================================
