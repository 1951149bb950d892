mod sqlite;

pub use sqlite::SqliteStore;

use crate::SearchError;
use async_trait::async_trait;
use pypi_search_types::{Order, SearchQuery, SearchResults};
use std::num::NonZeroU32;

/// Read access to the package metadata.
///
/// Implementations return matches sorted descending by `query.order` with
/// ties broken by name, truncated to `query.limit`, together with the
/// number of matches before truncation.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResults, SearchError>;
}

/// Resolve a raw search request against `store`.
///
/// Unknown order keys fail with [`SearchError::InvalidOrder`] before the
/// store is touched.
pub async fn search(
    store: &dyn MetadataStore,
    query: &str,
    limit: NonZeroU32,
    order: &str,
) -> Result<SearchResults, SearchError> {
    let order: Order = order.parse()?;
    store
        .search(&SearchQuery::new(query, limit, order))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pypi_search_types::InvalidOrder;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MetadataStore for CountingStore {
        async fn search(&self, _query: &SearchQuery) -> Result<SearchResults, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SearchResults::default())
        }
    }

    #[tokio::test]
    async fn invalid_order_never_reaches_the_store() {
        let store = CountingStore::default();

        let err = search(&store, "", NonZeroU32::MIN, "name")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SearchError::InvalidOrder(InvalidOrder(ref order)) if order == "name"
        ));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn valid_order_is_forwarded() {
        let store = CountingStore::default();

        search(&store, "", NonZeroU32::MIN, "stars").await.unwrap();

        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }
}
