use pypi_search_types::InvalidOrder;

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("failed to create the database connection pool")]
    PoolCreationFailed(#[source] sqlx::Error),

    #[error("failed to get a database connection")]
    ClientError(#[source] sqlx::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    InvalidOrder(#[from] InvalidOrder),

    #[error("the metadata store is unavailable")]
    StoreUnavailable(#[source] sqlx::Error),
}

impl From<PoolError> for SearchError {
    fn from(err: PoolError) -> Self {
        match err {
            PoolError::PoolCreationFailed(err) | PoolError::ClientError(err) => {
                Self::StoreUnavailable(err)
            }
        }
    }
}

impl From<sqlx::Error> for SearchError {
    fn from(err: sqlx::Error) -> Self {
        Self::StoreUnavailable(err)
    }
}
