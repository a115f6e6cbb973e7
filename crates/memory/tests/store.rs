use std::time::Duration;

use aisleron_memory::{FakeDatabaseBackup, MemoryStore};
use aisleron_shared::{
    Aisle, AisleProduct, AisleProductRepository, AisleRepository, DatabaseBackup, Error,
    FilterType, Location, LocationRepository, Product, ProductRepository, Repository, Store,
};
use futures::StreamExt;

#[tokio::test]
async fn test_new_store_is_seeded_with_home() -> anyhow::Result<()> {
    let store = MemoryStore::new();

    let home = store.locations().get_home().await?;
    assert_eq!(home.id, 1);
    assert_eq!(home.name, "Home");

    let default = store.aisles().get_default_aisle_for(home.id).await?.unwrap();
    assert_eq!(default.id, 1);
    assert_eq!(default.rank, 0);

    let empty = MemoryStore::empty();
    assert!(matches!(
        empty.locations().get_home().await.unwrap_err(),
        Error::HomeLocationMissing
    ));

    Ok(())
}

#[tokio::test]
async fn test_ids_are_generated_per_table() -> anyhow::Result<()> {
    let store = MemoryStore::new();

    let shop = store
        .locations()
        .add(&Location::shop("Corner Shop", FilterType::All, false))
        .await?;
    let milk = store.products().add(&Product::new("Milk", false)).await?;
    let bread = store.products().add(&Product::new("Bread", false)).await?;

    assert_eq!(shop, 2);
    assert_eq!((milk, bread), (1, 2));

    Ok(())
}

#[tokio::test]
async fn test_failed_batch_leaves_store_untouched() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    store.products().add(&Product::new("Milk", true)).await?;

    let err = store
        .products()
        .add_multiple(&[Product::new("Eggs", true), Product::new("MILK", true)])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DuplicateProductName));
    assert!(store.products().get_by_name("eggs").await?.is_none());
    assert_eq!(store.products().get_all().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_placements_follow_product_changes() -> anyhow::Result<()> {
    let store = MemoryStore::new();

    let mut milk = Product::new("Milk", false);
    milk.id = store.products().add(&milk).await?;
    store
        .aisle_products()
        .add(&AisleProduct {
            id: 0,
            aisle_id: 1,
            rank: 1,
            product: milk.clone(),
        })
        .await?;

    milk.name = "Oat Milk".to_owned();
    store.products().update(&milk).await?;
    let placements = store.aisle_products().get_by_aisle(1).await?;
    assert_eq!(placements[0].product.name, "Oat Milk");

    store.products().remove(&milk).await?;
    assert!(store.aisle_products().get_by_aisle(1).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_placement_needs_existing_aisle_and_product() -> anyhow::Result<()> {
    let store = MemoryStore::new();

    let err = store
        .aisle_products()
        .add(&AisleProduct {
            id: 0,
            aisle_id: 1,
            rank: 1,
            product: Product {
                id: 7,
                ..Product::new("Ghost", false)
            },
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Unknown(_)));

    let err = store.aisles().add(&Aisle::new("Dairy", 9, 1)).await.unwrap_err();
    assert!(matches!(err, Error::Unknown(_)));

    Ok(())
}

#[tokio::test]
async fn test_aggregate_reemits_after_placement() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let mut home = store.locations().get_location_with_aisles_with_products(1);

    let first = home.next().await.unwrap()?.unwrap();
    assert!(first.aisles[0].products.is_empty());

    let milk = store.products().add(&Product::new("Milk", false)).await?;
    let product = store.products().get(milk).await?.unwrap();
    store
        .aisle_products()
        .add(&AisleProduct {
            id: 0,
            aisle_id: 1,
            rank: 1,
            product,
        })
        .await?;

    let latest = loop {
        let next = tokio::time::timeout(Duration::from_secs(5), home.next())
            .await?
            .unwrap()?
            .unwrap();
        if !next.aisles[0].products.is_empty() {
            break next;
        }
    };
    assert_eq!(latest.aisles[0].products[0].product.name, "Milk");

    Ok(())
}

#[tokio::test]
async fn test_fake_backup_records_calls() -> anyhow::Result<()> {
    let backup = FakeDatabaseBackup::new();
    assert_eq!(backup.database_name().as_deref(), Some("aisleron.db"));

    let path = backup
        .backup_database("backups".as_ref(), "aisleron-backup-20240101_000000.db")
        .await?;
    backup.restore_database(&path).await?;

    assert_eq!(backup.backups().await, vec![path.clone()]);
    assert_eq!(backup.restores().await, vec![path]);

    let failing = FakeDatabaseBackup::failing();
    let err = failing.restore_database("nope.db".as_ref()).await.unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert_eq!(failing.restores().await.len(), 1);
    assert!(FakeDatabaseBackup::unnamed().database_name().is_none());

    Ok(())
}
