use crate::{Order, Package};
use std::num::NonZeroU32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Empty matches every package.
    pub query: String,
    pub limit: NonZeroU32,
    pub order: Order,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>, limit: NonZeroU32, order: Order) -> Self {
        Self {
            query: query.into(),
            limit,
            order,
        }
    }
}

/// Ranked packages, truncated to the limit, plus the size of the full
/// match set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    pub packages: Vec<Package>,
    pub total: u64,
}
