//! Database migration utilities

use aisleron::Config;
use std::path::PathBuf;

/// Create the database file if missing and run all migrations
pub async fn migrate(config: &Config) -> anyhow::Result<()> {
    let pool = aisleron::create_pool(&config.database.url, 1).await?;

    tracing::info!("Migrating database");
    aisleron::migrate(&pool).await?;

    pool.close().await;

    Ok(())
}

/// Drop the database file and run migrations
pub async fn reset(config: &Config) -> anyhow::Result<()> {
    let options = aisleron::db::connect_options(&config.database.url)?;
    let database = options.get_filename().to_path_buf();

    tracing::info!("Dropping database");

    for suffix in ["", "-wal", "-shm"] {
        let mut file = database.clone().into_os_string();
        file.push(suffix);
        let file = PathBuf::from(file);

        if file.exists() {
            std::fs::remove_file(&file)?;
            tracing::info!("Dropped database file: {}", file.display());
        }
    }

    migrate(config).await?;

    Ok(())
}
