use crate::{
    error::AxumNope,
    handlers::{home, search},
};
use axum::{Router as AxumRouter, response::IntoResponse, routing::get};

pub(crate) fn build_axum_routes() -> AxumRouter {
    AxumRouter::new()
        .route("/", get(home::home_page))
        .route("/search", get(search::search_handler))
        .route("/search/", get(search::search_handler))
        .route("/api/v1/search", get(search::search_api_handler))
        .fallback(fallback)
}

async fn fallback() -> impl IntoResponse {
    AxumNope::ResourceNotFound
}

#[cfg(test)]
mod tests {
    use crate::testing::{AxumRouterTestExt as _, TestEnvironment};
    use anyhow::Result;
    use axum::http::StatusCode;
    use test_case::test_case;

    #[test_case("/")]
    #[test_case("/search/?query=a")]
    #[test_case("/search?query=a")]
    #[test_case("/api/v1/search?query=a")]
    #[tokio::test]
    async fn routes_respond(path: &str) -> Result<()> {
        let env = TestEnvironment::new().await?;
        env.web_app().assert_success(path).await?;
        Ok(())
    }

    #[test_case("/releases")]
    #[test_case("/search/extra")]
    #[test_case("/api/v2/search")]
    #[tokio::test]
    async fn unknown_routes_are_not_found(path: &str) -> Result<()> {
        let env = TestEnvironment::new().await?;
        assert_eq!(
            env.web_app().get(path).await?.status(),
            StatusCode::NOT_FOUND
        );
        Ok(())
    }
}
