use std::{path::PathBuf, str::FromStr};

use aisleron_product::SqliteProductRepository;
use aisleron_shared::Changes;
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};

pub struct TestState {
    pub pool: SqlitePool,
    pub repository: SqliteProductRepository,
}

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<TestState> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    aisleron_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(TestState {
        repository: SqliteProductRepository::new(pool.clone(), Changes::new()),
        pool,
    })
}
