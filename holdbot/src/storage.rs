//! Persistence of bags.
//!
//! Every channel's bag is stored as an [`Inventory`] under its case-folded channel name. The
//! bag's capacity is not stored; it comes from the configuration.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bag_of_holding::Inventory;
use thiserror::Error;
use tracing::info;

use crate::config::StorageConfig;

mod file;
mod memory;
#[cfg(feature = "database")]
mod postgres;

pub use file::FileStore;
pub use memory::MemoryStore;
#[cfg(feature = "database")]
pub use postgres::PgStore;

/// Storage errors.
#[derive(Error, Debug)]
pub enum Error {
    /// The bag file exists but could not be read.
    #[error("could not read {}", path.display())]
    Read {
        /// Path of the bag file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The bag file could not be written.
    #[error("could not write {}", path.display())]
    Write {
        /// Path of the bag file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The bag file does not contain valid bags.
    #[error("could not parse {}", path.display())]
    Parse {
        /// Path of the bag file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The bags could not be serialized.
    #[error("could not serialize bags")]
    Serialize(#[source] serde_json::Error),
    /// Postgres storage was configured, but support for it was not compiled in.
    #[error("postgres storage requires the `database` feature")]
    DatabaseDisabled,
    /// Failed to establish a connection to the database.
    #[cfg(feature = "database")]
    #[error("Cannot connect to database")]
    OpenDatabase(#[source] sqlx::Error),
    /// Failed to acquire a database connection from the connection pool.
    #[cfg(feature = "database")]
    #[error("Could not acquire a connection from the connection pool")]
    DatabasePool(#[source] sqlx::Error),
    /// Database schema migration failed.
    #[cfg(feature = "database")]
    #[error("Database migration failed")]
    DatabaseMigration(#[source] sqlx::migrate::MigrateError),
    /// A database query operation failed.
    #[cfg(feature = "database")]
    #[error("Database query failed")]
    DatabaseQueryFailed(#[from] sqlx::Error),
}

/// A place where bags are kept between commands.
#[async_trait]
pub trait BagStore: Send + Sync {
    /// Loads the bag of `channel`. A channel that has never been seen has an empty bag.
    async fn load(&self, channel: &str) -> Result<Inventory, Error>;

    /// Replaces the stored bag of `channel`.
    async fn save(&self, channel: &str, inventory: &Inventory) -> Result<(), Error>;
}

/// Returns the key that a channel's bag is stored under.
///
/// Channel names are case-insensitive on IRC, so `#Games` and `#games` share a bag.
#[must_use]
pub fn channel_key(channel: &str) -> String {
    channel.to_lowercase()
}

/// Opens the storage backend described by `config`.
///
/// # Errors
///
/// Returns an error if the backend cannot be opened, e.g. when the bag file is unreadable or the
/// database is unreachable.
pub async fn open(config: &StorageConfig) -> Result<Arc<dyn BagStore>, Error> {
    match config {
        StorageConfig::Memory => {
            info!("keeping bags in memory");

            Ok(Arc::new(MemoryStore::new()))
        }
        StorageConfig::File { path } => {
            info!(?path, "keeping bags in file");

            Ok(Arc::new(FileStore::open(path).await?))
        }
        #[cfg(feature = "database")]
        StorageConfig::Postgres(db_config) => {
            info!("keeping bags in postgres");

            let store = PgStore::connect(db_config).await?;
            store.migrate().await?;

            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "database"))]
        StorageConfig::Postgres(_) => Err(Error::DatabaseDisabled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_keys_are_case_folded() {
        assert_eq!(channel_key("#Games"), "#games");
        assert_eq!(channel_key("#games"), "#games");
    }

    #[tokio::test]
    async fn open_memory_store() {
        let store = open(&StorageConfig::Memory).await.unwrap();

        assert_eq!(store.load("#games").await.unwrap(), Inventory::default());
    }

    #[cfg(not(feature = "database"))]
    #[tokio::test]
    async fn postgres_requires_feature() {
        let config = StorageConfig::Postgres(crate::config::DbConfig {
            url: "postgres://localhost/holdbot".to_string(),
            max_connections: 1,
            idle_timeout: std::time::Duration::from_secs(1),
        });

        assert!(matches!(open(&config).await, Err(Error::DatabaseDisabled)));
    }
}
