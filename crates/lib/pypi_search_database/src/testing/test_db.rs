use crate::{Config, Pool, SqliteStore, migrate, testing::FakePackage};
use anyhow::{Context as _, Result};
use tempfile::TempDir;

/// A migrated SQLite database in its own temporary directory.
///
/// The directory, and with it the database, is removed on drop.
#[derive(Debug)]
pub struct TestDatabase {
    pool: Pool,
    _dir: TempDir,
}

impl TestDatabase {
    pub async fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("error creating temp dir")?;
        let config = Config {
            database_url: format!("sqlite://{}", dir.path().join("pypi-search.db").display()),
            max_pool_size: 4,
            min_pool_idle: 0,
        };

        let pool = Pool::new(&config).await?;
        migrate(&pool).await.context("error running migrations")?;

        Ok(Self { pool, _dir: dir })
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn store(&self) -> SqliteStore {
        SqliteStore::new(self.pool.clone())
    }

    pub fn fake_package(&self) -> FakePackage {
        FakePackage::new(self.pool.clone())
    }
}
