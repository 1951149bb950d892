use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use pypi_search_config::AppConfig as _;
use pypi_search_database::{
    Pool, SqliteStore,
    import::{Snapshot, import_snapshot},
};
use std::{num::NonZeroU32, path::PathBuf};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _guard = pypi_search_logging::init(pypi_search_logging::Config::from_environment()?)
        .context("error initializing logging")?;

    if let Err(err) = CommandLine::parse().handle_args().await {
        eprintln!("error running admin CLI: {:?}", err);
        drop(_guard);
        std::process::exit(1);
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    about = env!("CARGO_PKG_DESCRIPTION"),
    version,
    rename_all = "kebab-case",
)]
enum CommandLine {
    /// Database operations
    Database {
        #[command(subcommand)]
        subcommand: DatabaseSubcommand,
    },

    /// Search the metadata store, like the web interface does
    Search {
        #[arg(name = "QUERY", default_value = "")]
        query: String,
        #[arg(short, long, default_value = "5")]
        limit: NonZeroU32,
        /// One of `downloads`, `stars` or `forks`
        #[arg(short, long, default_value = "downloads")]
        order: String,
    },
}

impl CommandLine {
    async fn handle_args(self) -> Result<()> {
        let config = pypi_search_database::Config::from_environment()?;
        let pool = Pool::new(&config)
            .await
            .context("error creating database pool")?;

        let result = self.run(&pool).await;
        pool.close().await;
        result
    }

    async fn run(self, pool: &Pool) -> Result<()> {
        match self {
            Self::Database { subcommand } => subcommand.handle_args(pool).await?,
            Self::Search {
                query,
                limit,
                order,
            } => {
                let store = SqliteStore::new(pool.clone());
                let results = pypi_search_database::search(&store, &query, limit, &order).await?;

                for package in &results.packages {
                    match &package.github_url {
                        Some(url) => println!(
                            "{}\t{}\tdownloads={}\tstars={}\tforks={}\t{url}",
                            package.name,
                            package.version,
                            package.downloads,
                            package.stars,
                            package.forks,
                        ),
                        None => println!(
                            "{}\t{}\tdownloads={}",
                            package.name, package.version, package.downloads,
                        ),
                    }
                }
                println!("Showed {} / {}", results.packages.len(), results.total);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
enum DatabaseSubcommand {
    /// Run database migrations
    Migrate,

    /// Replace all packages with the updater's snapshot files
    Import {
        /// JSON lines with the latest release of every package
        #[arg(long)]
        metadata: PathBuf,
        /// JSON lines with download counts
        #[arg(long)]
        downloads: PathBuf,
        /// JSON object with GitHub repository stats, keyed by package name
        #[arg(long)]
        github: Option<PathBuf>,
    },
}

impl DatabaseSubcommand {
    async fn handle_args(self, pool: &Pool) -> Result<()> {
        match self {
            Self::Migrate => pypi_search_database::migrate(pool)
                .await
                .context("Failed to run database migrations")?,

            Self::Import {
                metadata,
                downloads,
                github,
            } => {
                pypi_search_database::migrate(pool)
                    .await
                    .context("Failed to run database migrations")?;

                let snapshot = Snapshot::load(&metadata, &downloads, github.as_deref())
                    .await
                    .context("Failed to load snapshot")?;
                let stats = import_snapshot(pool, &snapshot)
                    .await
                    .context("Failed to import snapshot")?;

                info!(?stats, "import finished");
                println!(
                    "Imported {} packages ({} with downloads, {} with GitHub stats)",
                    stats.packages, stats.with_downloads, stats.with_github
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory as _;
    use indoc::indoc;
    use pypi_search_database::{MetadataStore as _, testing::TestDatabase};
    use pypi_search_types::{Order, SearchQuery};
    use test_case::test_case;

    #[test]
    fn verify_cli() {
        CommandLine::command().debug_assert();
    }

    #[test]
    fn parse_import() {
        let cli = CommandLine::try_parse_from([
            "pypi-search-admin",
            "database",
            "import",
            "--metadata",
            "data/metadata_lines.json",
            "--downloads",
            "data/downloads_lines.json",
        ])
        .unwrap();

        assert_eq!(
            cli,
            CommandLine::Database {
                subcommand: DatabaseSubcommand::Import {
                    metadata: "data/metadata_lines.json".into(),
                    downloads: "data/downloads_lines.json".into(),
                    github: None,
                }
            }
        );
    }

    #[test_case(&["pypi-search-admin", "database", "import"])]
    #[test_case(&["pypi-search-admin", "search", "x", "--limit", "0"])]
    fn parse_errors(args: &[&str]) {
        assert!(CommandLine::try_parse_from(args).is_err());
    }

    #[tokio::test]
    async fn import_then_search() -> Result<()> {
        let db = TestDatabase::new().await?;
        let dir = tempfile::tempdir()?;
        let metadata = dir.path().join("metadata_lines.json");
        let downloads = dir.path().join("downloads_lines.json");
        let github = dir.path().join("github.json");
        tokio::fs::write(
            &metadata,
            indoc! {r#"
                {"name": "requests", "version": "2.31.0", "upload_time": "2023-05-22 15:12:44+00:00", "summary": "Python HTTP for Humans."}
                {"name": "urllib3", "version": "2.0.7", "upload_time": "2023-10-17 17:46:22+00:00", "summary": "HTTP library"}
            "#},
        )
        .await?;
        tokio::fs::write(
            &downloads,
            "{\"name\": \"urllib3\", \"download_count\": 20}\n{\"name\": \"requests\", \"download_count\": 10}\n",
        )
        .await?;
        tokio::fs::write(
            &github,
            r#"{"requests": {"url": "https://github.com/psf/requests", "stargazerCount": 5, "forkCount": 1}}"#,
        )
        .await?;

        CommandLine::Database {
            subcommand: DatabaseSubcommand::Import {
                metadata,
                downloads,
                github: Some(github),
            },
        }
        .run(db.pool())
        .await?;

        let results = db
            .store()
            .search(&SearchQuery::new("http", NonZeroU32::MIN.saturating_add(9), Order::Stars))
            .await?;
        let names: Vec<_> = results.packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["requests", "urllib3"]);

        CommandLine::Search {
            query: "http".into(),
            limit: NonZeroU32::MIN,
            order: "forks".into(),
        }
        .run(db.pool())
        .await?;
        Ok(())
    }

    #[tokio::test]
    async fn search_rejects_unknown_order() -> Result<()> {
        let db = TestDatabase::new().await?;

        let err = CommandLine::Search {
            query: String::new(),
            limit: NonZeroU32::MIN,
            order: "name".into(),
        }
        .run(db.pool())
        .await
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "invalid order `name`, expected one of `downloads`, `stars` or `forks`"
        );
        Ok(())
    }
}
