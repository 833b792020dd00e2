//! Store configuration.
//!
//! Built once at process start and passed by value into [`open_backend`].
//! Missing or invalid settings fail here, at startup, as `Unavailable`.

use std::path::PathBuf;
use std::sync::Arc;

use crate::constants::{
    DATA_DIR_DEFAULT, DATA_FILE_NAME_DEFAULT, POSTGRES_CONNECTIONS_COUNT_DEFAULT,
    POSTGRES_CONNECTIONS_COUNT_MAX,
};
use crate::storage::{FileBackend, StorageBackend, StoreError, StoreResult};

/// Environment variable selecting the backend (`postgres` or `file`).
pub const ENV_BACKEND: &str = "SCRIBE_BACKEND";
/// Primary database URL variable.
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
/// Fallback database URL variable.
pub const ENV_POSTGRES_URL: &str = "POSTGRES_URL";
/// Pool size variable.
pub const ENV_DB_MAX_CONNECTIONS: &str = "SCRIBE_DB_MAX_CONNECTIONS";
/// File backend artifact path variable.
pub const ENV_DATA_FILE: &str = "SCRIBE_DATA_FILE";
/// Seed-on-start flag variable.
pub const ENV_SEED: &str = "SEED_BLOG";

/// Which medium to store posts in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    /// Relational backend.
    Postgres {
        /// `postgres://` or `postgresql://` URL
        url: String,
        /// Pool size
        max_connections: u32,
    },
    /// Single-artifact file backend.
    File {
        /// Artifact path
        path: PathBuf,
    },
}

/// Process-wide store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Backend selection
    pub backend: BackendConfig,
    /// Create demo posts when the store starts empty
    pub seed: bool,
}

impl StoreConfig {
    /// File backend at `path`, no seeding.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: BackendConfig::File { path: path.into() },
            seed: false,
        }
    }

    /// Read configuration from the process environment.
    ///
    /// # Errors
    /// `Unavailable` if the settings are missing or invalid.
    pub fn from_env() -> StoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup` (environment-shaped key/value source).
    ///
    /// # Errors
    /// `Unavailable` if the settings are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> StoreResult<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let url = get(ENV_DATABASE_URL).or_else(|| get(ENV_POSTGRES_URL));
        let kind = match get(ENV_BACKEND) {
            Some(kind) => kind.trim().to_lowercase(),
            None if url.is_some() => "postgres".to_string(),
            None => "file".to_string(),
        };

        let backend = match kind.as_str() {
            "postgres" | "postgresql" => {
                let url = url.ok_or_else(|| {
                    StoreError::unavailable(format!(
                        "postgres backend selected but neither {ENV_DATABASE_URL} nor {ENV_POSTGRES_URL} is set"
                    ))
                })?;
                if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
                    return Err(StoreError::unavailable(format!(
                        "{ENV_DATABASE_URL} must be a postgres:// or postgresql:// URL"
                    )));
                }
                let max_connections = match get(ENV_DB_MAX_CONNECTIONS) {
                    Some(raw) => parse_connections(&raw)?,
                    None => POSTGRES_CONNECTIONS_COUNT_DEFAULT,
                };
                BackendConfig::Postgres {
                    url,
                    max_connections,
                }
            }
            "file" => {
                let raw = get(ENV_DATA_FILE)
                    .unwrap_or_else(|| format!("{DATA_DIR_DEFAULT}/{DATA_FILE_NAME_DEFAULT}"));
                let path = PathBuf::from(shellexpand::tilde(&raw).into_owned());
                if path.file_name().is_none() {
                    return Err(StoreError::unavailable(format!(
                        "{ENV_DATA_FILE} must name a file, got {raw:?}"
                    )));
                }
                BackendConfig::File { path }
            }
            other => {
                return Err(StoreError::unavailable(format!(
                    "unknown {ENV_BACKEND} {other:?}, expected \"postgres\" or \"file\""
                )))
            }
        };

        let seed = get(ENV_SEED)
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self { backend, seed })
    }
}

fn parse_connections(raw: &str) -> StoreResult<u32> {
    let n: u32 = raw.trim().parse().map_err(|e| {
        StoreError::unavailable_with(format!("invalid {ENV_DB_MAX_CONNECTIONS} {raw:?}"), e)
    })?;
    if n == 0 || n > POSTGRES_CONNECTIONS_COUNT_MAX {
        return Err(StoreError::unavailable(format!(
            "{ENV_DB_MAX_CONNECTIONS} must be between 1 and {POSTGRES_CONNECTIONS_COUNT_MAX}, got {n}"
        )));
    }
    Ok(n)
}

/// Construct the single backend instance described by `config`.
///
/// Connects eagerly so an unreachable database fails at startup.
///
/// # Errors
/// `Unavailable` if the medium cannot be opened, or if Postgres is selected
/// in a build without the `postgres` feature.
pub async fn open_backend(config: &StoreConfig) -> StoreResult<Arc<dyn StorageBackend>> {
    match &config.backend {
        BackendConfig::File { path } => Ok(Arc::new(FileBackend::open(path.clone()).await?)),
        #[cfg(feature = "postgres")]
        BackendConfig::Postgres {
            url,
            max_connections,
        } => Ok(Arc::new(
            crate::storage::PostgresBackend::connect(url, *max_connections).await?,
        )),
        #[cfg(not(feature = "postgres"))]
        BackendConfig::Postgres { .. } => Err(StoreError::unavailable(
            "postgres backend requested but this build lacks the `postgres` feature",
        )),
    }
}
