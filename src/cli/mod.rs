mod backup;
mod location;
mod product;

pub use backup::*;
pub use location::*;
pub use product::*;

use aisleron::{Config, SqliteStore};
use sqlx::SqlitePool;

/// Opens the configured database, migrated and ready to use.
pub async fn open(config: &Config) -> anyhow::Result<(SqlitePool, SqliteStore)> {
    let pool = aisleron::create_pool(&config.database.url, config.database.max_connections).await?;
    aisleron::migrate(&pool).await?;

    Ok((pool.clone(), SqliteStore::new(pool)))
}
