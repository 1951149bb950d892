use pypi_search_types::Order;
use strum::IntoEnumIterator as _;
use url::form_urlencoded;

/// One entry of the sort control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SortOption {
    pub(crate) order: Order,
    /// the current search, re-issued with `order`
    pub(crate) url: String,
    pub(crate) selected: bool,
}

/// Values echoed into the search form so changing the order keeps the
/// search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchForm {
    pub(crate) query: String,
    pub(crate) limit: u32,
    pub(crate) sort_options: Vec<SortOption>,
}

impl SearchForm {
    pub(crate) fn new(query: impl Into<String>, limit: u32, current: Order) -> Self {
        let query = query.into();
        let sort_options = Order::iter()
            .map(|order| SortOption {
                order,
                url: search_url(&query, limit, order),
                selected: order == current,
            })
            .collect();

        Self {
            query,
            limit,
            sort_options,
        }
    }
}

pub(crate) fn search_url(query: &str, limit: u32, order: Order) -> String {
    let params = form_urlencoded::Serializer::new(String::new())
        .append_pair("query", query)
        .append_pair("limit", &limit.to_string())
        .append_pair("order", order.as_str())
        .finish();
    format!("/search/?{params}")
}
