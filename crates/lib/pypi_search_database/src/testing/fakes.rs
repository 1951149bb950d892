use crate::Pool;
use anyhow::Result;
use chrono::{DateTime, TimeZone as _, Utc};

#[must_use = "FakePackage does nothing until you call .create()"]
pub struct FakePackage {
    pool: Pool,
    name: String,
    version: String,
    summary: String,
    latest_upload: Option<DateTime<Utc>>,
    downloads: u64,
    github_url: Option<String>,
    stars: u64,
    forks: u64,
}

impl FakePackage {
    pub fn new(pool: Pool) -> Self {
        FakePackage {
            pool,
            name: "fake-package".into(),
            version: "1.0.0".into(),
            summary: "Fake package".into(),
            latest_upload: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).single(),
            downloads: 0,
            github_url: None,
            stars: 0,
            forks: 0,
        }
    }

    pub fn name(mut self, new: impl Into<String>) -> Self {
        self.name = new.into();
        self
    }

    pub fn version(mut self, new: impl Into<String>) -> Self {
        self.version = new.into();
        self
    }

    pub fn summary(mut self, new: impl Into<String>) -> Self {
        self.summary = new.into();
        self
    }

    pub fn latest_upload(mut self, new: Option<DateTime<Utc>>) -> Self {
        self.latest_upload = new;
        self
    }

    pub fn downloads(mut self, new: u64) -> Self {
        self.downloads = new;
        self
    }

    pub fn github(mut self, url: impl Into<String>, stars: u64, forks: u64) -> Self {
        self.github_url = Some(url.into());
        self.stars = stars;
        self.forks = forks;
        self
    }

    pub async fn create(self) -> Result<()> {
        let mut conn = self.pool.get_async().await?;

        sqlx::query(
            "INSERT OR REPLACE INTO packages
                (name, version, summary, latest_upload, downloads, github_url, stars, forks)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&self.name)
        .bind(&self.version)
        .bind(&self.summary)
        .bind(self.latest_upload)
        .bind(i64::try_from(self.downloads)?)
        .bind(&self.github_url)
        .bind(i64::try_from(self.stars)?)
        .bind(i64::try_from(self.forks)?)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}
