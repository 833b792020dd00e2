//! Storage errors.
//!
//! TigerStyle: four kinds, propagated unchanged from backend to caller.

use thiserror::Error;

/// Coarse classification of a [`StoreError`], for transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller data cannot produce a valid record.
    Validation,
    /// Target slug absent.
    NotFound,
    /// Slug already present.
    Conflict,
    /// Storage medium unreachable or misconfigured.
    Unavailable,
}

/// Errors returned by storage backends and the content store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Caller-supplied data cannot produce a valid record.
    #[error("validation error: {0}")]
    Validation(String),

    /// No post with this slug.
    #[error("post not found: {slug}")]
    NotFound {
        /// The missing slug.
        slug: String,
    },

    /// A post with this slug already exists.
    #[error("slug already exists: {slug}")]
    Conflict {
        /// The conflicting slug.
        slug: String,
    },

    /// The storage medium cannot be reached, read, or written.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Human-readable description of the failure.
        message: String,
        /// The underlying error, if available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl StoreError {
    /// Build a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Build a not-found error.
    pub fn not_found(slug: impl Into<String>) -> Self {
        Self::NotFound { slug: slug.into() }
    }

    /// Build a conflict error.
    pub fn conflict(slug: impl Into<String>) -> Self {
        Self::Conflict { slug: slug.into() }
    }

    /// Build an unavailable error without an underlying cause.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
            source: None,
        }
    }

    /// Build an unavailable error wrapping its cause.
    pub fn unavailable_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Unavailable {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Unavailable { .. } => ErrorKind::Unavailable,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::unavailable_with(format!("io error: {e}"), e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::unavailable_with(format!("serialization error: {e}"), e)
    }
}

/// Result alias for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;
