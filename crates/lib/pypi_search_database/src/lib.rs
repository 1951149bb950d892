mod config;
mod errors;
pub mod import;
mod migrations;
mod pool;
mod store;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::Config;
pub use errors::{PoolError, SearchError};
pub use migrations::migrate;
pub use pool::Pool;
pub use store::{MetadataStore, SqliteStore, search};
