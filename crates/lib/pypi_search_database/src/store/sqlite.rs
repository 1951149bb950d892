use crate::{Pool, SearchError, store::MetadataStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt as _;
use pypi_search_types::{Order, Package, SearchQuery, SearchResults};
use tracing::{error, instrument};

const COLUMNS: &str = "name, version, summary, latest_upload, downloads, github_url, stars, forks";

/// `name` matches case-sensitively, `summary` ignoring case.
///
/// SQLite's `lower()` only folds ASCII, so summaries are compared here with
/// full Unicode lowercasing.
struct Matcher<'a> {
    query: &'a str,
    folded: String,
}

impl<'a> Matcher<'a> {
    fn new(query: &'a str) -> Self {
        Self {
            query,
            folded: query.to_lowercase(),
        }
    }

    fn matches(&self, name: &str, summary: &str) -> bool {
        name.contains(self.query) || summary.to_lowercase().contains(&self.folded)
    }
}

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: Pool,
}

impl SqliteStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// An empty query matches every package, so SQLite can count and truncate.
    async fn list_all(&self, query: &SearchQuery) -> Result<SearchResults, SearchError> {
        // count and page come from the same snapshot
        let mut tx = self.pool.begin().await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM packages")
            .fetch_one(&mut *tx)
            .await?;

        let rows: Vec<PackageRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS}
             FROM packages
             ORDER BY {column} DESC, name ASC
             LIMIT ?1",
            column = order_column(query.order),
        ))
        .bind(i64::from(query.limit.get()))
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(SearchResults {
            packages: rows.into_iter().map(Package::from).collect(),
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    /// Walks the packages in result order, counting every match and keeping
    /// the first `limit` of them. A single statement reads one snapshot.
    async fn filter(&self, query: &SearchQuery) -> Result<SearchResults, SearchError> {
        let matcher = Matcher::new(&query.query);
        let limit = usize::try_from(query.limit.get()).unwrap_or(usize::MAX);

        let sql = format!(
            "SELECT {COLUMNS}
             FROM packages
             ORDER BY {column} DESC, name ASC",
            column = order_column(query.order),
        );

        let mut conn = self.pool.get_async().await?;
        let mut rows = sqlx::query_as::<_, PackageRow>(&sql).fetch(&mut *conn);

        let mut packages = Vec::new();
        let mut total = 0u64;
        while let Some(row) = rows.try_next().await? {
            if matcher.matches(&row.name, &row.summary) {
                total += 1;
                if packages.len() < limit {
                    packages.push(Package::from(row));
                }
            }
        }

        Ok(SearchResults { packages, total })
    }
}

fn order_column(order: Order) -> &'static str {
    match order {
        Order::Downloads => "downloads",
        Order::Stars => "stars",
        Order::Forks => "forks",
    }
}

#[derive(sqlx::FromRow)]
struct PackageRow {
    name: String,
    version: String,
    summary: String,
    latest_upload: Option<DateTime<Utc>>,
    downloads: i64,
    github_url: Option<String>,
    stars: i64,
    forks: i64,
}

impl From<PackageRow> for Package {
    fn from(row: PackageRow) -> Self {
        // the table has CHECK constraints on the counters
        let counter = |value: i64| u64::try_from(value).unwrap_or_default();

        Package {
            name: row.name,
            version: row.version,
            summary: row.summary,
            latest_upload: row.latest_upload,
            downloads: counter(row.downloads),
            github_url: row.github_url.filter(|url| !url.is_empty()),
            stars: counter(row.stars),
            forks: counter(row.forks),
        }
    }
}

#[async_trait]
impl MetadataStore for SqliteStore {
    #[instrument(skip_all, fields(query = %query.query, limit = query.limit.get(), order = %query.order))]
    async fn search(&self, query: &SearchQuery) -> Result<SearchResults, SearchError> {
        let result = if query.query.is_empty() {
            self.list_all(query).await
        } else {
            self.filter(query).await
        };

        if let Err(err) = &result {
            error!(?err, "metadata store search failed");
        }
        result
    }
}
