use crate::{
    Config,
    error::{AxumNope, AxumResult, JsonAxumResult},
    handlers::axum_redirect,
    impl_axum_webpage,
    page::SearchForm,
};
use anyhow::anyhow;
use askama::Template;
use axum::{
    Extension, Json,
    extract::Query,
    response::{IntoResponse, Response as AxumResponse},
};
use pypi_search_database::MetadataStore;
use pypi_search_types::{Order, Package, SearchQuery, SearchResults};
use serde::{Deserialize, Serialize};
use std::{
    num::{IntErrorKind, NonZeroU32},
    sync::Arc,
};
use tracing::{instrument, warn};

/// Raw query parameters, validated by [`SearchParams::resolve`].
#[derive(Debug, Deserialize)]
pub(crate) struct SearchParams {
    query: Option<String>,
    limit: Option<String>,
    order: Option<String>,
}

impl SearchParams {
    fn has_query(&self) -> bool {
        self.query.as_deref().is_some_and(|q| !q.trim().is_empty())
    }

    /// * missing `limit` uses the configured default, larger ones are clamped
    /// * `limit` that is not a positive integer is a bad request
    /// * unknown `order` falls back to the default order
    fn resolve(self, config: &Config) -> Result<SearchQuery, AxumNope> {
        let limit = match self.limit.as_deref().map(str::trim) {
            None | Some("") => config.default_limit,
            Some(raw) => {
                // any positive integer is accepted, too large ones saturate
                let limit = match raw.parse::<u32>() {
                    Ok(limit) => limit,
                    Err(err) if *err.kind() == IntErrorKind::PosOverflow => u32::MAX,
                    Err(_) => {
                        return Err(AxumNope::BadRequest(anyhow!(
                            "invalid limit `{raw}`, expected a positive integer"
                        )));
                    }
                };
                let limit = NonZeroU32::new(limit)
                    .ok_or_else(|| AxumNope::BadRequest(anyhow!("limit must be greater than 0")))?;
                limit.min(config.max_limit)
            }
        };

        let order = match self.order.as_deref() {
            None | Some("") => Order::default(),
            Some(raw) => raw.parse().unwrap_or_else(|err| {
                warn!(%err, "unknown search order, falling back to the default");
                Order::default()
            }),
        };

        Ok(SearchQuery::new(self.query.unwrap_or_default(), limit, order))
    }
}

#[derive(Template, Debug)]
#[template(path = "search.html")]
pub(crate) struct SearchPage {
    form: SearchForm,
    /// ranked by the store, never re-sorted here
    packages: Vec<Package>,
    total: u64,
}

impl SearchPage {
    fn new(query: SearchQuery, results: SearchResults) -> Self {
        Self {
            form: SearchForm::new(query.query, query.limit.get(), query.order),
            packages: results.packages,
            total: results.total,
        }
    }

    fn shown(&self) -> usize {
        self.packages.len()
    }
}

impl_axum_webpage! { SearchPage }

#[instrument(skip_all)]
pub(crate) async fn search_handler(
    Extension(config): Extension<Arc<Config>>,
    Extension(store): Extension<Arc<dyn MetadataStore>>,
    Query(params): Query<SearchParams>,
) -> AxumResult<AxumResponse> {
    let has_query = params.has_query();
    let query = params.resolve(&config)?;

    if !has_query {
        // nothing to search for, back to the search form
        return Ok(axum_redirect("/")?.into_response());
    }

    let results = store.search(&query).await?;

    Ok(SearchPage::new(query, results).into_response())
}

#[derive(Debug, Serialize)]
pub(crate) struct SearchResponse {
    packages: Vec<Package>,
    total: u64,
    query: String,
    limit: u32,
    order: Order,
}

/// JSON twin of [`search_handler`], an empty query lists every package.
#[instrument(skip_all)]
pub(crate) async fn search_api_handler(
    Extension(config): Extension<Arc<Config>>,
    Extension(store): Extension<Arc<dyn MetadataStore>>,
    Query(params): Query<SearchParams>,
) -> JsonAxumResult<Json<SearchResponse>> {
    let query = params.resolve(&config)?;
    let results = store.search(&query).await?;

    Ok(Json(SearchResponse {
        packages: results.packages,
        total: results.total,
        query: query.query,
        limit: query.limit.get(),
        order: query.order,
    }))
}
