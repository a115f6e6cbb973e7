//! Test helper functions for database setup

#![allow(dead_code)]

use aisleron::SqliteStore;
use aisleron_shared::{Aisle, AisleProduct, Product, Repository, Store};
use sqlx::SqlitePool;
use temp_dir::TempDir;

/// Migrated database file inside `dir` and a store over it.
pub async fn setup_sqlite(dir: &TempDir) -> anyhow::Result<(SqlitePool, SqliteStore)> {
    let url = format!("sqlite:{}", dir.child("aisleron.db").to_str().unwrap());
    let pool = aisleron::create_pool(&url, 2).await?;
    aisleron::migrate(&pool).await?;

    Ok((pool.clone(), SqliteStore::new(pool)))
}

/// Creates `name` and places it in `aisle` at `rank`.
pub async fn place<S: Store>(
    store: &S,
    aisle: &Aisle,
    name: &str,
    rank: i32,
) -> anyhow::Result<AisleProduct> {
    let mut product = Product::new(name, false);
    product.id = store.products().add(&product).await?;

    let mut aisle_product = AisleProduct {
        id: 0,
        aisle_id: aisle.id,
        rank,
        product,
    };
    aisle_product.id = store.aisle_products().add(&aisle_product).await?;

    Ok(aisle_product)
}

pub fn names(aisle_products: &[AisleProduct]) -> Vec<&str> {
    aisle_products
        .iter()
        .map(|aisle_product| aisle_product.product.name.as_str())
        .collect()
}
