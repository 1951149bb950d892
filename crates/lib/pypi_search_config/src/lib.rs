mod env;

pub use env::{env, maybe_env, require_env};

use anyhow::Result;

/// Implemented by every crate- or binary-level config struct.
///
/// Values are read from the process environment, never from files.
pub trait AppConfig: Sized {
    fn from_environment() -> Result<Self>;

    /// Config used by unit tests; defaults to reading the environment.
    #[cfg(any(test, feature = "testing"))]
    fn test_config() -> Result<Self> {
        Self::from_environment()
    }
}
