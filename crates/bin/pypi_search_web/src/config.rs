use anyhow::{Result, ensure};
use pypi_search_config::{AppConfig, env, maybe_env};
use std::{num::NonZeroU32, time::Duration};

const DEFAULT_LIMIT: NonZeroU32 = NonZeroU32::new(5).unwrap();
const MAX_LIMIT: NonZeroU32 = NonZeroU32::new(2000).unwrap();

#[derive(Debug)]
pub struct Config {
    // request timeout in seconds
    pub(crate) request_timeout: Option<Duration>,
    pub(crate) report_request_timeouts: bool,

    /// used when a search doesn't pass `limit`
    pub(crate) default_limit: NonZeroU32,
    /// larger limits are clamped to this
    pub(crate) max_limit: NonZeroU32,
}

impl AppConfig for Config {
    fn from_environment() -> Result<Self> {
        let config = Self {
            request_timeout: maybe_env::<u64>("PYPI_SEARCH_REQUEST_TIMEOUT")?
                .map(Duration::from_secs),
            report_request_timeouts: env("PYPI_SEARCH_REPORT_REQUEST_TIMEOUTS", false)?,
            default_limit: env("PYPI_SEARCH_DEFAULT_LIMIT", DEFAULT_LIMIT)?,
            max_limit: env("PYPI_SEARCH_MAX_LIMIT", MAX_LIMIT)?,
        };

        ensure!(
            config.default_limit <= config.max_limit,
            "PYPI_SEARCH_DEFAULT_LIMIT ({}) is larger than PYPI_SEARCH_MAX_LIMIT ({})",
            config.default_limit,
            config.max_limit,
        );

        Ok(config)
    }

    #[cfg(test)]
    fn test_config() -> Result<Self> {
        Ok(Self {
            request_timeout: None,
            report_request_timeouts: false,
            default_limit: DEFAULT_LIMIT,
            max_limit: NonZeroU32::new(20).unwrap(),
        })
    }
}
