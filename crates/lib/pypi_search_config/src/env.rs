use anyhow::{Context as _, Result, anyhow};
use std::{env::VarError, error::Error, str::FromStr};
use tracing::trace;

/// Read and parse `var`, falling back to `default` when it is unset.
pub fn env<T>(var: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Error + Send + Sync + 'static,
{
    Ok(maybe_env(var)?.unwrap_or(default))
}

/// Read and parse `var`, failing when it is unset.
pub fn require_env<T>(var: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Error + Send + Sync + 'static,
{
    maybe_env(var)?.with_context(|| anyhow!("configuration variable {var} is missing"))
}

/// Read and parse `var`.
///
/// An unset variable is `Ok(None)`; a set but unparsable one is an error,
/// so typos in deployment configs don't silently turn into defaults.
pub fn maybe_env<T>(var: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Error + Send + Sync + 'static,
{
    let content = match std::env::var(var) {
        Ok(content) => content,
        Err(VarError::NotPresent) => {
            trace!(var, "optional configuration variable is not set");
            return Ok(None);
        }
        Err(VarError::NotUnicode(_)) => {
            return Err(anyhow!("configuration variable {var} is not UTF-8"));
        }
    };

    content
        .parse::<T>()
        .map(Some)
        .with_context(|| format!("failed to parse configuration variable {var}"))
}
