//! Scribe Core - Slug-Keyed Post Store
//!
//! TigerStyle: one contract, two storage media, explicit errors.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               ContentStore                   │
//! │  create / read / update / delete / list      │
//! │  backup / restore / seed_if_empty            │
//! ├─────────────────────────────────────────────┤
//! │  slug::derive           │ title -> slug      │
//! ├─────────────────────────────────────────────┤
//! │  StorageBackend trait                        │
//! │    FileBackend          │ one JSON artifact  │
//! │    PostgresBackend      │ posts table        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use scribe_core::{open_backend, ContentStore, StoreConfig};
//!
//! let config = StoreConfig::from_env()?;
//! let store = ContentStore::new(open_backend(&config).await?);
//! let post = store.create("Hello, World!", "summary", "content").await?;
//! assert_eq!(post.slug, "hello-world");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backup;
pub mod clock;
pub mod config;
pub mod constants;
pub mod slug;
pub mod storage;
pub mod store;

// Re-export common types
pub use backup::RestoreRecord;
pub use clock::{Clock, SimClock, SystemClock};
pub use config::{open_backend, BackendConfig, StoreConfig};
pub use constants::*;
pub use storage::{
    ErrorKind, FieldUpdate, FileBackend, NewPost, Post, PostPatch, StorageBackend, StoreError,
    StoreResult,
};
pub use store::ContentStore;

#[cfg(feature = "postgres")]
pub use storage::PostgresBackend;
