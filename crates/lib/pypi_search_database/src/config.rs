use pypi_search_config::{AppConfig, env, require_env};

#[derive(Debug, Clone)]
pub struct Config {
    /// `sqlite://` url of the metadata store.
    pub database_url: String,
    pub max_pool_size: u32,
    pub min_pool_idle: u32,
}

impl AppConfig for Config {
    fn from_environment() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: require_env("PYPI_SEARCH_DATABASE_URL")?,
            max_pool_size: env("PYPI_SEARCH_MAX_POOL_SIZE", 16u32)?,
            min_pool_idle: env("PYPI_SEARCH_MIN_POOL_IDLE", 1u32)?,
        })
    }
}
