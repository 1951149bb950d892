use crate::Pool;
use sqlx::migrate::{MigrateError, Migrator};
use tracing::info;

static MIGRATOR: Migrator = sqlx::migrate!();

/// Bring the schema up to date, already applied migrations are skipped.
pub async fn migrate(pool: &Pool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool.inner()).await?;
    info!("database schema is up to date");
    Ok(())
}
