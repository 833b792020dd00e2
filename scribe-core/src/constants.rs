//! TigerStyle Constants
//!
//! Limits and defaults, named with units and `_MAX`/`_DEFAULT` suffixes.

/// Default file name of the file backend artifact.
pub const DATA_FILE_NAME_DEFAULT: &str = "posts.json";

/// Default directory holding the file backend artifact.
pub const DATA_DIR_DEFAULT: &str = "~/.scribe";

/// Default Postgres pool size.
pub const POSTGRES_CONNECTIONS_COUNT_DEFAULT: u32 = 10;

/// Upper bound on the Postgres pool size accepted from configuration.
pub const POSTGRES_CONNECTIONS_COUNT_MAX: u32 = 100;

/// Largest single step a `SimClock` may take.
pub const CLOCK_ADVANCE_MS_MAX: u64 = 365 * 24 * 60 * 60 * 1000;

/// Milliseconds per second.
pub const TIME_MS_PER_SEC: u64 = 1000;
