use crate::config::LOG_ENV_VAR;
use std::str::FromStr as _;
use tracing_subscriber::{EnvFilter, filter::Directive};

/// Install a subscriber writing to the test harness output.
///
/// Safe to call from every test, only the first call installs anything.
pub fn init() {
    let Ok(directive) = Directive::from_str("pypi_search=debug") else {
        return;
    };
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(directive)
                .with_env_var(LOG_ENV_VAR)
                .from_env_lossy(),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
