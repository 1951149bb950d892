//! Web interface of pypi-search

pub(crate) mod home;
pub(crate) mod search;

use crate::{Config, routes};
use anyhow::{Context as _, Error, Result, anyhow, bail};
use axum::{
    Router as AxumRouter,
    extract::{Extension, MatchedPath, Request as AxumRequest},
    http::StatusCode,
    middleware,
    middleware::Next,
    response::{IntoResponse, Response as AxumResponse},
};
use axum_extra::middleware::option_layer;
use pypi_search_database::MetadataStore;
use sentry::integrations::tower as sentry_tower;
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, instrument};

const DEFAULT_BIND: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), 8080);

async fn log_timeouts_to_sentry(req: AxumRequest, next: Next) -> AxumResponse {
    let uri = req.uri().clone();

    let response = next.run(req).await;

    if response.status() == StatusCode::REQUEST_TIMEOUT {
        tracing::error!(?uri, "request timeout");
    }

    response
}

async fn set_sentry_transaction_name_from_axum_route(
    request: AxumRequest,
    next: Next,
) -> AxumResponse {
    let route_name = if let Some(path) = request.extensions().get::<MatchedPath>() {
        path.as_str()
    } else {
        request.uri().path()
    };

    sentry::configure_scope(|scope| {
        scope.set_transaction(Some(route_name));
    });

    next.run(request).await
}

fn apply_middleware(
    router: AxumRouter,
    config: Arc<Config>,
    store: Arc<dyn MetadataStore>,
) -> AxumRouter {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(sentry_tower::NewSentryLayer::new_from_top())
            .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
            .layer(middleware::from_fn(
                set_sentry_transaction_name_from_axum_route,
            ))
            .layer(CatchPanicLayer::new())
            .layer(option_layer(
                config
                    .report_request_timeouts
                    .then_some(middleware::from_fn(log_timeouts_to_sentry)),
            ))
            .layer(option_layer(config.request_timeout.map(|to| {
                TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, to)
            })))
            .layer(Extension(config.clone()))
            .layer(Extension(store)),
    )
}

pub(crate) fn build_axum_app(config: Arc<Config>, store: Arc<dyn MetadataStore>) -> AxumRouter {
    apply_middleware(routes::build_axum_routes(), config, store)
}

#[instrument(skip_all)]
pub async fn run_web_server(
    addr: Option<SocketAddr>,
    config: Arc<Config>,
    store: Arc<dyn MetadataStore>,
) -> Result<(), Error> {
    let axum_addr = addr.unwrap_or(DEFAULT_BIND);

    info!(
        "Starting web server on `{}:{}`",
        axum_addr.ip(),
        axum_addr.port()
    );

    let app = build_axum_app(config, store).into_make_service();
    let listener = tokio::net::TcpListener::bind(axum_addr)
        .await
        .context("error binding socket for web server")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(?err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(?err, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("signal received, starting graceful shutdown");
}

#[instrument]
pub(crate) fn axum_redirect<U>(uri: U) -> Result<impl IntoResponse, Error>
where
    U: TryInto<http::Uri> + std::fmt::Debug,
    <U as TryInto<http::Uri>>::Error: std::fmt::Debug,
{
    let uri: http::Uri = uri
        .try_into()
        .map_err(|err| anyhow!("invalid URI: {:?}", err))?;

    if let Some(path_and_query) = uri.path_and_query() {
        if path_and_query.as_str().starts_with("//") {
            bail!("protocol relative redirects are forbidden");
        }
    } else {
        // we always want a path to redirect to, even when it's just `/`
        bail!("missing path in URI");
    }

    Ok((
        StatusCode::FOUND,
        [(
            http::header::LOCATION,
            http::HeaderValue::try_from(uri.to_string()).context("invalid uri for redirect")?,
        )],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{AxumResponseTestExt as _, AxumRouterTestExt as _, TestEnvironment};
    use axum::{Router, routing::get};
    use test_case::test_case;
    use tower::ServiceExt as _;

    #[tokio::test]
    async fn test_index_returns_success() -> Result<()> {
        let env = TestEnvironment::new().await?;
        let web = env.web_app();
        assert!(web.get("/").await?.status().is_success());
        Ok(())
    }

    #[tokio::test]
    async fn panics_become_internal_errors() -> Result<()> {
        async fn panicking() -> &'static str {
            panic!("boom")
        }

        let env = TestEnvironment::new().await?;
        let web = apply_middleware(
            Router::new().route("/panic", get(panicking)),
            env.config(),
            env.store(),
        );

        let response = web
            .oneshot(
                AxumRequest::builder()
                    .uri("/panic")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await?;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        Ok(())
    }

    #[test]
    fn test_axum_redirect() {
        let response = axum_redirect("/something").unwrap().into_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(http::header::LOCATION).unwrap(),
            "/something"
        );
        assert_eq!(response.redirect_target(), Some("/something"));
    }

    #[test_case("without_leading_slash")]
    #[test_case("//with_double_leading_slash")]
    fn test_axum_redirect_failure(path: &str) {
        assert!(axum_redirect(path).is_err());
    }
}
