use async_trait::async_trait;
use bag_of_holding::Inventory;
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};

use super::{BagStore, Error, channel_key};
use crate::config::DbConfig;

static MIGRATOR: Migrator = sqlx::migrate!();

/// Keeps bags in a PostgreSQL database, one row per channel.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects to the database using the provided configuration.
    ///
    /// # Errors
    ///
    /// If unable to establish connection to the database, `Err(Error::OpenDatabase)` is returned.
    pub async fn connect(config: &DbConfig) -> Result<PgStore, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .idle_timeout(config.idle_timeout)
            .connect(&config.url)
            .await
            .map_err(Error::OpenDatabase)?;

        Ok(PgStore { pool })
    }

    /// Applies migrations to the database.
    ///
    /// # Errors
    ///
    /// If a connection cannot be acquired from the connection pool, `Error::DatabasePool` is
    /// returned.
    ///
    /// If an error occurs during migration, `Error::DatabaseMigration` is returned.
    pub async fn migrate(&self) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await.map_err(Error::DatabasePool)?;

        MIGRATOR
            .run(&mut conn)
            .await
            .map_err(Error::DatabaseMigration)
    }
}

#[async_trait]
impl BagStore for PgStore {
    async fn load(&self, channel: &str) -> Result<Inventory, Error> {
        let row: Option<(Vec<String>, Vec<String>)> =
            sqlx::query_as("SELECT contents, history FROM bags WHERE channel = $1")
                .bind(channel_key(channel))
                .fetch_optional(&self.pool)
                .await?;

        Ok(row
            .map(|(contents, history)| Inventory { contents, history })
            .unwrap_or_default())
    }

    async fn save(&self, channel: &str, inventory: &Inventory) -> Result<(), Error> {
        sqlx::query(
            "INSERT INTO bags (channel, contents, history) VALUES ($1, $2, $3) \
             ON CONFLICT (channel) DO UPDATE \
             SET contents = EXCLUDED.contents, history = EXCLUDED.history, updated_at = now()",
        )
        .bind(channel_key(channel))
        .bind(&inventory.contents)
        .bind(&inventory.history)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
