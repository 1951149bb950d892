mod order;
mod package;
mod search;

pub use order::{InvalidOrder, Order};
pub use package::Package;
pub use search::{SearchQuery, SearchResults};
