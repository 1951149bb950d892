use anyhow::{Context as _, Result};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use http_body_util::BodyExt as _;
use tower::ServiceExt as _;

pub(crate) trait AxumRouterTestExt {
    async fn get(&self, path: &str) -> Result<Response>;
    async fn assert_success(&self, path: &str) -> Result<Response>;
    async fn assert_redirect(&self, path: &str, expected_target: &str) -> Result<Response>;
}

impl AxumRouterTestExt for Router {
    async fn get(&self, path: &str) -> Result<Response> {
        Ok(self
            .clone()
            .oneshot(Request::builder().uri(path).body(Body::empty())?)
            .await?)
    }

    async fn assert_success(&self, path: &str) -> Result<Response> {
        let response = self.get(path).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("GET {path} failed with {status}: {body}");
        }
        Ok(response)
    }

    async fn assert_redirect(&self, path: &str, expected_target: &str) -> Result<Response> {
        let response = self.get(path).await?;
        assert_eq!(response.status(), StatusCode::FOUND, "GET {path}");
        assert_eq!(response.redirect_target(), Some(expected_target), "GET {path}");
        Ok(response)
    }
}

pub(crate) trait AxumResponseTestExt {
    async fn text(self) -> Result<String>;
    async fn json(self) -> Result<serde_json::Value>;
    fn redirect_target(&self) -> Option<&str>;
}

impl AxumResponseTestExt for Response {
    async fn text(self) -> Result<String> {
        let bytes = self.into_body().collect().await?.to_bytes();
        String::from_utf8(bytes.to_vec()).context("response body is not UTF-8")
    }

    async fn json(self) -> Result<serde_json::Value> {
        let body = self.text().await?;
        serde_json::from_str(&body).context("response body is not JSON")
    }

    fn redirect_target(&self) -> Option<&str> {
        self.headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }
}
