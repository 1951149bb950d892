mod config;
mod log_format;
#[cfg(feature = "testing")]
pub mod testing;

pub use config::{Config, SentryConfig};
pub use log_format::{InvalidLogFormat, LogFormat};

use sentry::{integrations::panic as sentry_panic, integrations::tracing as sentry_tracing};
use std::sync::Arc;
use tracing_subscriber::prelude::*;

/// Keeps the sentry client alive, events are flushed when it is dropped.
pub struct Guard {
    #[allow(dead_code)]
    sentry_guard: Option<sentry::ClientInitGuard>,
}

pub fn init(config: Config) -> anyhow::Result<Guard> {
    let log_formatter = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    let tracing_registry = tracing_subscriber::registry()
        .with(log_formatter)
        .with(config.filter);

    let sentry_guard = if let Some(sentry_config) = config.sentry {
        tracing::subscriber::set_global_default(tracing_registry.with(
            sentry_tracing::layer().event_filter(|md| {
                // errors that were already sent with `sentry::capture_*`
                if md.fields().field("reported_to_sentry").is_some() {
                    sentry_tracing::EventFilter::Ignore
                } else {
                    sentry_tracing::default_event_filter(md)
                }
            }),
        ))?;

        let traces_sample_rate = sentry_config.traces_sample_rate;
        let traces_sampler = move |ctx: &sentry::TransactionContext| -> f32 {
            match ctx.sampled() {
                Some(true) => 1.0,
                Some(false) => 0.0,
                None => traces_sample_rate,
            }
        };

        Some(sentry::init((
            sentry_config.dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                attach_stacktrace: true,
                traces_sampler: Some(Arc::new(traces_sampler)),
                ..Default::default()
            }
            .add_integration(sentry_panic::PanicIntegration::default()),
        )))
    } else {
        tracing::subscriber::set_global_default(tracing_registry)?;
        None
    };

    Ok(Guard { sentry_guard })
}
