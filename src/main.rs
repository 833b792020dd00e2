//! Scribe - Slug-Keyed Post Store
//!
//! Command-line and HTTP front end for the content store.
//!
//! # Usage
//!
//! ```bash
//! # Serve the HTTP API
//! scribe serve --bind 127.0.0.1:8000
//!
//! # Create, read, list
//! scribe create --title "Hello, World!" --summary "s" --content "c"
//! scribe get hello-world
//! scribe list
//!
//! # Snapshot and restore
//! scribe backup --output posts.json
//! scribe restore posts.json
//! ```
//!
//! Backend selection comes from the environment (see `scribe_core::config`);
//! a `.env` file in the working directory is loaded first.

pub mod api;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use scribe_core::{open_backend, ContentStore, PostPatch, RestoreRecord, StoreConfig};
use serde::Serialize;

// =============================================================================
// TigerStyle Constants
// =============================================================================

/// Default HTTP bind address
pub const HTTP_BIND_ADDRESS_DEFAULT: &str = "127.0.0.1:8000";

/// Application name
pub const APP_NAME: &str = "scribe";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// CLI
// =============================================================================

/// Scribe - slug-keyed post store
#[derive(Parser, Debug)]
#[command(name = APP_NAME)]
#[command(about = "Slug-keyed post store with file and Postgres backends")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// HTTP bind address
        #[arg(short, long, default_value = HTTP_BIND_ADDRESS_DEFAULT)]
        bind: String,
    },
    /// List all posts, newest first
    List,
    /// Show one post
    Get {
        /// Post slug
        slug: String,
    },
    /// Create a post (slug is derived from the title)
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        summary: String,
        #[arg(long)]
        content: String,
    },
    /// Update fields of a post
    Update {
        /// Post slug
        slug: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        summary: Option<String>,
        #[arg(long)]
        content: Option<String>,
        /// Publish (true) or hide (false)
        #[arg(long)]
        published: Option<bool>,
    },
    /// Delete a post
    Delete {
        /// Post slug
        slug: String,
    },
    /// Write a full snapshot as JSON
    Backup {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace every post with the contents of a snapshot file
    Restore {
        /// Snapshot file (JSON array of posts)
        input: PathBuf,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    let filter = match cli.verbose {
        0 => "info,sqlx=warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("{} v{}", APP_NAME, APP_VERSION);

    // Configuration and backend are resolved once, before any command runs.
    let config = StoreConfig::from_env()?;
    let backend = open_backend(&config).await?;
    tracing::info!(backend = backend.name(), "Storage backend ready");
    let store = ContentStore::new(backend);

    if config.seed {
        store.seed_if_empty().await?;
    }

    match cli.command {
        Commands::Serve { bind } => {
            let addr: std::net::SocketAddr = bind.parse()?;
            tracing::info!("Starting HTTP server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, api::router(store)).await?;
        }
        Commands::List => print_json(&store.list().await?)?,
        Commands::Get { slug } => print_json(&store.read(&slug).await?)?,
        Commands::Create {
            title,
            summary,
            content,
        } => print_json(&store.create(&title, &summary, &content).await?)?,
        Commands::Update {
            slug,
            title,
            summary,
            content,
            published,
        } => {
            let patch = PostPatch {
                title,
                summary,
                content,
                published,
                ..PostPatch::default()
            };
            print_json(&store.update(&slug, patch).await?)?;
        }
        Commands::Delete { slug } => {
            store.delete(&slug).await?;
            print_json(&serde_json::json!({ "ok": true }))?;
        }
        Commands::Backup { output } => {
            let posts = store.backup().await?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, serde_json::to_vec_pretty(&posts)?).await?;
                    tracing::info!(path = %path.display(), count = posts.len(), "Wrote backup");
                }
                None => print_json(&posts)?,
            }
        }
        Commands::Restore { input } => {
            let bytes = tokio::fs::read(&input).await?;
            let records: Vec<RestoreRecord> = serde_json::from_slice(&bytes)?;
            let count = store.restore(records).await?;
            print_json(&serde_json::json!({ "ok": true, "count": count }))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_create_requires_summary_and_content() {
        assert!(Cli::try_parse_from(["scribe", "create", "--title", "T"]).is_err());
        let cli = Cli::try_parse_from([
            "scribe", "create", "--title", "T", "--summary", "s", "--content", "c",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Create { .. }));
    }

    #[test]
    fn test_parse_update_flags() {
        let cli = Cli::parse_from([
            "scribe", "update", "hello-world", "--summary", "x", "--published", "false",
        ]);
        match cli.command {
            Commands::Update {
                slug,
                title,
                summary,
                published,
                ..
            } => {
                assert_eq!(slug, "hello-world");
                assert!(title.is_none());
                assert_eq!(summary.as_deref(), Some("x"));
                assert_eq!(published, Some(false));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
