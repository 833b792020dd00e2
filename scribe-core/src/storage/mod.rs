//! Storage - Backend Trait and Implementations
//!
//! TigerStyle: one contract, two media.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    StorageBackend Trait                      │
//! └─────────────────────────────────────────────────────────────┘
//!          ↑                              ↑
//!          │                              │
//! ┌────────┴────────┐           ┌────────┴────────┐
//! │   FileBackend   │           │ PostgresBackend │
//! │ (single process)│           │    (server)     │
//! └─────────────────┘           └─────────────────┘
//! ```

mod backend;
mod error;
mod file;
mod post;

#[cfg(feature = "postgres")]
mod postgres;

pub use backend::StorageBackend;
pub use error::{ErrorKind, StoreError, StoreResult};
pub use file::FileBackend;
pub use post::{FieldUpdate, NewPost, Post, PostPatch};

pub(crate) use post::{published_default, require_field};

#[cfg(feature = "postgres")]
pub use postgres::PostgresBackend;
