use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use tracing::info;

/// Creates (or upgrades) the schema at the given database URL.
pub async fn init_database(database_url: &str) -> Result<()> {
    info!("Initializing database: {}", database_url);

    let db = Database::connect(database_url).await?;
    Migrator::up(&db, None).await?;

    info!("Database initialized successfully");
    Ok(())
}
