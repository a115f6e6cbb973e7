use std::path::PathBuf;

use aisleron::usecase::{CreateDatabaseBackup, RestoreDatabaseBackup};
use aisleron::{Config, SqliteBackup};
use aisleron_shared::{LocationRepository, Store};

pub async fn backup(config: Config, folder: Option<PathBuf>) -> anyhow::Result<()> {
    let folder = folder.unwrap_or_else(|| PathBuf::from(&config.backup.folder));
    tokio::fs::create_dir_all(&folder).await?;

    let (pool, store) = super::open(&config).await?;
    let usecase = CreateDatabaseBackup::new(SqliteBackup::new(pool, store.changes().clone()));
    let target = usecase.call(&folder).await?;

    println!("{}", target.display());

    Ok(())
}

pub async fn restore(config: Config, file: PathBuf) -> anyhow::Result<()> {
    let (pool, store) = super::open(&config).await?;
    let usecase = RestoreDatabaseBackup::new(SqliteBackup::new(pool, store.changes().clone()));
    usecase.call(&file).await?;

    let home = store.locations().get_home().await?;
    tracing::info!(home = %home.name, "restored {}", file.display());

    Ok(())
}
