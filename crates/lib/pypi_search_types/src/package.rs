use chrono::{DateTime, Utc};
use serde::Serialize;

/// One published PyPI project, latest version only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    pub name: String,
    /// Advisory, never used for ordering.
    pub version: String,
    pub summary: String,
    pub latest_upload: Option<DateTime<Utc>>,
    pub downloads: u64,
    pub github_url: Option<String>,
    /// Only meaningful when `github_url` is set.
    pub stars: u64,
    /// Only meaningful when `github_url` is set.
    pub forks: u64,
}

impl Package {
    pub fn upload_date(&self) -> Option<String> {
        self.latest_upload
            .map(|ts| ts.format("%Y-%m-%d").to_string())
    }

    pub fn pypi_url(&self) -> String {
        format!("https://pypi.org/project/{}/", self.name)
    }

    /// `(url, stars, forks)`, only for packages with a linked repository.
    pub fn github(&self) -> Option<(&str, u64, u64)> {
        self.github_url
            .as_deref()
            .map(|url| (url, self.stars, self.forks))
    }
}
