use std::{path::PathBuf, str::FromStr};

use aisleron_aisle::{SqliteAisleProductRepository, SqliteAisleRepository};
use aisleron_product::SqliteProductRepository;
use aisleron_shared::{AisleProduct, Changes, Product, Repository};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};

/// Home location seeded by the migration.
pub const HOME_ID: i64 = 1;
/// Default aisle of the home location.
pub const HOME_DEFAULT_AISLE_ID: i64 = 1;

pub struct TestState {
    pub pool: SqlitePool,
    pub changes: Changes,
    pub aisles: SqliteAisleRepository,
    pub aisle_products: SqliteAisleProductRepository,
    pub products: SqliteProductRepository,
}

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<TestState> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    aisleron_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    let changes = Changes::new();

    Ok(TestState {
        aisles: SqliteAisleRepository::new(pool.clone(), changes.clone()),
        aisle_products: SqliteAisleProductRepository::new(pool.clone(), changes.clone()),
        products: SqliteProductRepository::new(pool.clone(), changes.clone()),
        changes,
        pool,
    })
}

impl TestState {
    /// Creates `name` and places it in `aisle_id` at `rank`.
    pub async fn place(&self, aisle_id: i64, name: &str, rank: i32) -> anyhow::Result<AisleProduct> {
        let mut product = Product::new(name, false);
        product.id = self.products.add(&product).await?;

        let mut aisle_product = AisleProduct {
            id: 0,
            aisle_id,
            rank,
            product,
        };
        aisle_product.id = self.aisle_products.add(&aisle_product).await?;

        Ok(aisle_product)
    }
}
