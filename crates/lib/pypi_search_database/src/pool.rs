use crate::{Config, errors::PoolError};
use sqlx::{
    Sqlite, SqlitePool, Transaction,
    pool::PoolConnection,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use std::{str::FromStr as _, time::Duration};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Pool {
    async_pool: SqlitePool,
}

impl Pool {
    pub async fn new(config: &Config) -> Result<Pool, PoolError> {
        debug!(url = %config.database_url, "creating database pool");

        let acquire_timeout = Duration::from_secs(30);
        let max_lifetime = Duration::from_secs(30 * 60);
        let idle_timeout = Duration::from_secs(10 * 60);

        // WAL lets searches keep reading while an import rewrites the table.
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(PoolError::PoolCreationFailed)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let async_pool = SqlitePoolOptions::new()
            .max_connections(config.max_pool_size)
            .min_connections(config.min_pool_idle)
            .max_lifetime(max_lifetime)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .connect_lazy_with(options);

        Ok(Pool { async_pool })
    }

    pub async fn get_async(&self) -> Result<PoolConnection<Sqlite>, PoolError> {
        self.async_pool
            .acquire()
            .await
            .map_err(PoolError::ClientError)
    }

    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, PoolError> {
        self.async_pool
            .begin()
            .await
            .map_err(PoolError::ClientError)
    }

    pub(crate) fn inner(&self) -> &SqlitePool {
        &self.async_pool
    }

    /// Wait for all connections to be returned and close them.
    pub async fn close(&self) {
        self.async_pool.close().await;
    }
}
