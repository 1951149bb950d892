use crate::{Config, handlers::build_axum_app};
use anyhow::Result;
use axum::Router;
use pypi_search_config::AppConfig as _;
use pypi_search_database::{MetadataStore, testing::{FakePackage, TestDatabase}};
use std::sync::Arc;

pub(crate) struct TestEnvironment {
    db: TestDatabase,
    config: Arc<Config>,
}

impl TestEnvironment {
    pub(crate) async fn new() -> Result<Self> {
        pypi_search_logging::testing::init();

        Ok(Self {
            db: TestDatabase::new().await?,
            config: Arc::new(Config::test_config()?),
        })
    }

    pub(crate) fn db(&self) -> &TestDatabase {
        &self.db
    }

    pub(crate) fn config(&self) -> Arc<Config> {
        self.config.clone()
    }

    pub(crate) fn store(&self) -> Arc<dyn MetadataStore> {
        Arc::new(self.db.store())
    }

    pub(crate) fn fake_package(&self) -> FakePackage {
        self.db.fake_package()
    }

    pub(crate) fn web_app(&self) -> Router {
        build_axum_app(self.config(), self.store())
    }
}
