//! Wholesale replacement of the `packages` table from the updater's
//! snapshot files.
//!
//! * metadata: JSON lines, one latest release per package
//! * downloads: JSON lines with a `download_count` per package
//! * github (optional): one JSON object keyed by package name
//!
//! Unparsable lines abort the import, nothing is written in that case.

use crate::{Pool, PoolError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use pypi_search_types::Package;
use serde::Deserialize;
use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fmt,
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFile {
    Metadata,
    Downloads,
    Github,
}

impl fmt::Display for SnapshotFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Metadata => "metadata",
            Self::Downloads => "downloads",
            Self::Github => "github",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read {file} file {}", path.display())]
    Read {
        file: SnapshotFile,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {file} file at line {line}")]
    Malformed {
        file: SnapshotFile,
        /// 1-based, 0 for the single-document github file.
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid upload time `{value}` for {name} at metadata line {line}")]
    InvalidUploadTime {
        name: String,
        value: String,
        line: usize,
    },

    #[error("counter for {name} does not fit into the database")]
    CounterOverflow { name: String },

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error("failed to write the snapshot to the database")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Deserialize)]
struct MetadataLine {
    name: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    upload_time: Option<String>,
    #[serde(default)]
    summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DownloadsLine {
    name: String,
    #[serde(default)]
    download_count: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GithubEntry {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    stargazer_count: u64,
    #[serde(default)]
    fork_count: u64,
}

/// Counts reported after an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub packages: usize,
    pub with_downloads: usize,
    pub with_github: usize,
}

/// The combined content of the snapshot files, one entry per package.
#[derive(Debug, Default)]
pub struct Snapshot {
    packages: BTreeMap<String, Package>,
    stats: ImportStats,
}

impl Snapshot {
    #[instrument]
    pub async fn load(
        metadata: &Path,
        downloads: &Path,
        github: Option<&Path>,
    ) -> Result<Self, ImportError> {
        async fn read(file: SnapshotFile, path: &Path) -> Result<String, ImportError> {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ImportError::Read {
                    file,
                    path: path.to_owned(),
                    source,
                })
        }

        let metadata = read(SnapshotFile::Metadata, metadata).await?;
        let downloads = read(SnapshotFile::Downloads, downloads).await?;
        let github = match github {
            Some(path) => Some(read(SnapshotFile::Github, path).await?),
            None => None,
        };

        Self::parse(&metadata, &downloads, github.as_deref())
    }

    pub fn parse(
        metadata: &str,
        downloads: &str,
        github: Option<&str>,
    ) -> Result<Self, ImportError> {
        let mut packages = BTreeMap::new();
        for (line, entry) in json_lines::<MetadataLine>(SnapshotFile::Metadata, metadata) {
            let entry = entry?;
            let latest_upload = match entry.upload_time.as_deref() {
                None | Some("") => None,
                Some(value) => Some(parse_upload_time(value).ok_or_else(|| {
                    ImportError::InvalidUploadTime {
                        name: entry.name.clone(),
                        value: value.to_owned(),
                        line,
                    }
                })?),
            };

            packages.insert(
                entry.name.clone(),
                Package {
                    name: entry.name,
                    version: entry.version.unwrap_or_default(),
                    summary: entry.summary.unwrap_or_default(),
                    latest_upload,
                    downloads: 0,
                    github_url: None,
                    stars: 0,
                    forks: 0,
                },
            );
        }

        let mut stats = ImportStats {
            packages: packages.len(),
            ..Default::default()
        };

        let mut unknown = 0usize;
        // a repeated name overwrites the earlier count
        let mut with_downloads = HashSet::new();
        for (_, entry) in json_lines::<DownloadsLine>(SnapshotFile::Downloads, downloads) {
            let entry = entry?;
            match packages.get_mut(&entry.name) {
                Some(package) => {
                    package.downloads = entry.download_count;
                    with_downloads.insert(entry.name);
                }
                None => unknown += 1,
            }
        }
        stats.with_downloads = with_downloads.len();
        if unknown > 0 {
            debug!(unknown, "ignored download rows without metadata");
        }

        if let Some(github) = github {
            let entries: HashMap<String, GithubEntry> =
                serde_json::from_str(github).map_err(|source| ImportError::Malformed {
                    file: SnapshotFile::Github,
                    line: 0,
                    source,
                })?;

            for (name, entry) in entries {
                let Some(package) = packages.get_mut(&name) else {
                    continue;
                };
                // the updater stores an empty object for missing repositories
                let Some(url) = entry.url.filter(|url| !url.is_empty()) else {
                    continue;
                };
                package.github_url = Some(url);
                package.stars = entry.stargazer_count;
                package.forks = entry.fork_count;
                stats.with_github += 1;
            }
        }

        Ok(Self { packages, stats })
    }

    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    pub fn stats(&self) -> ImportStats {
        self.stats
    }
}

/// Non-empty lines of `content` with their 1-based line number.
fn json_lines<T: serde::de::DeserializeOwned>(
    file: SnapshotFile,
    content: &str,
) -> impl Iterator<Item = (usize, Result<T, ImportError>)> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(move |(idx, line)| {
            let line_number = idx + 1;
            let parsed = serde_json::from_str(line).map_err(|source| ImportError::Malformed {
                file,
                line: line_number,
                source,
            });
            (line_number, parsed)
        })
}

/// BigQuery's stringified timestamps, RFC 3339, or a bare date.
fn parse_upload_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(ts) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(ts.and_utc());
    }

    let date = value.get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
}

/// Replace the contents of the `packages` table with `snapshot`.
///
/// Runs in a single transaction, concurrent searches see either the old or
/// the new data.
#[instrument(skip_all, fields(packages = snapshot.packages.len()))]
pub async fn import_snapshot(pool: &Pool, snapshot: &Snapshot) -> Result<ImportStats, ImportError> {
    let counter = |name: &str, value: u64| {
        i64::try_from(value).map_err(|_| ImportError::CounterOverflow {
            name: name.to_owned(),
        })
    };

    let mut tx = pool.begin().await?;

    let removed = sqlx::query("DELETE FROM packages")
        .execute(&mut *tx)
        .await?
        .rows_affected();

    for package in snapshot.packages() {
        sqlx::query(
            "INSERT INTO packages
                (name, version, summary, latest_upload, downloads, github_url, stars, forks)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&package.name)
        .bind(&package.version)
        .bind(&package.summary)
        .bind(package.latest_upload)
        .bind(counter(&package.name, package.downloads)?)
        .bind(&package.github_url)
        .bind(counter(&package.name, package.stars)?)
        .bind(counter(&package.name, package.forks)?)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    let stats = snapshot.stats();
    if stats.with_downloads < stats.packages {
        warn!(
            missing = stats.packages - stats.with_downloads,
            "packages without download counts were imported with 0 downloads"
        );
    }
    info!(
        removed,
        packages = stats.packages,
        with_downloads = stats.with_downloads,
        with_github = stats.with_github,
        "imported snapshot"
    );

    Ok(stats)
}
