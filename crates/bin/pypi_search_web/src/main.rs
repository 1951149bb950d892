use anyhow::Context as _;
use clap::Parser;
use pypi_search_config::AppConfig as _;
use pypi_search_database::{MetadataStore, Pool, SqliteStore};
use pypi_search_web::{Config, run_web_server};
use std::{net::SocketAddr, sync::Arc};

#[derive(Parser)]
#[command(
    about = env!("CARGO_PKG_DESCRIPTION"),
    version,
    rename_all = "kebab-case",
)]
struct Cli {
    #[arg(name = "SOCKET_ADDR", default_value = "0.0.0.0:8080")]
    socket_addr: SocketAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _guard = pypi_search_logging::init(pypi_search_logging::Config::from_environment()?)
        .context("error initializing logging")?;

    let args = Cli::parse();

    let db_config = pypi_search_database::Config::from_environment()?;
    let pool = Pool::new(&db_config)
        .await
        .context("error creating database pool")?;
    let store: Arc<dyn MetadataStore> = Arc::new(SqliteStore::new(pool));

    let config = Arc::new(Config::from_environment()?);

    run_web_server(Some(args.socket_addr), config, store).await?;

    Ok(())
}
