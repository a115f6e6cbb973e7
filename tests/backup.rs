use std::time::Duration;

use aisleron::SqliteBackup;
use aisleron::usecase::{CreateDatabaseBackup, RestoreDatabaseBackup};
use aisleron_shared::{
    AisleProductRepository, AisleRepository, DatabaseBackup, Error, FilterType, Location,
    LocationRepository, Product, ProductRepository, Repository, Store,
};
use futures::StreamExt;
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn test_database_name_is_file_name() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let (pool, store) = helpers::setup_sqlite(&dir).await?;

    let backup = SqliteBackup::new(pool, store.changes().clone());
    assert_eq!(backup.database_name().as_deref(), Some("aisleron.db"));

    Ok(())
}

#[tokio::test]
async fn test_backup_then_restore_round_trip() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let (pool, store) = helpers::setup_sqlite(&dir).await?;
    let backup = SqliteBackup::new(pool, store.changes().clone());

    let default = store.aisles().get_default_aisle_for(1).await?.unwrap();
    helpers::place(&store, &default, "Milk", 1).await?;
    store
        .locations()
        .add(&Location::shop("Market", FilterType::All, true))
        .await?;

    let folder = dir.child("backups");
    std::fs::create_dir(&folder)?;
    let file = CreateDatabaseBackup::new(backup.clone())
        .call(&folder)
        .await?;
    assert!(file.exists());
    assert!(
        file.file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("aisleron-backup-")
    );

    // diverge from the backup
    store.products().add(&Product::new("Bread", false)).await?;
    let market = store.locations().get_by_name("market").await?.unwrap();
    store.locations().remove(&market).await?;

    let mut list = store.locations().get_location_with_aisles_with_products(1);
    list.next().await.unwrap()?;

    RestoreDatabaseBackup::new(backup).call(&file).await?;

    let names = store
        .products()
        .get_all()
        .await?
        .into_iter()
        .map(|product| product.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Milk".to_owned()]);
    assert!(store.locations().get_by_name("Market").await?.is_some());
    assert_eq!(store.aisle_products().get_by_aisle(default.id).await?.len(), 1);

    // live queries see the restored data
    let home = tokio::time::timeout(Duration::from_secs(5), list.next())
        .await?
        .unwrap()?
        .unwrap();
    assert_eq!(helpers::names(&home.aisles[0].products), vec!["Milk"]);

    Ok(())
}

#[tokio::test]
async fn test_backup_into_missing_folder_fails() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let (pool, store) = helpers::setup_sqlite(&dir).await?;
    let backup = SqliteBackup::new(pool, store.changes().clone());

    let err = backup
        .backup_database(&dir.child("missing"), "aisleron-backup.db")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));

    Ok(())
}

#[tokio::test]
async fn test_restore_rejects_non_sqlite_file() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let (pool, store) = helpers::setup_sqlite(&dir).await?;
    let backup = SqliteBackup::new(pool, store.changes().clone());
    store.products().add(&Product::new("Milk", false)).await?;

    let file = dir.child("notes.db");
    std::fs::write(&file, "this is not a database, just some words in a file")?;
    let err = backup.restore_database(&file).await.unwrap_err();
    assert!(matches!(err, Error::InvalidBackup(_)));

    let short = dir.child("short.db");
    std::fs::write(&short, "SQLite")?;
    let err = backup.restore_database(&short).await.unwrap_err();
    assert!(matches!(err, Error::InvalidBackup(_)));

    let err = backup
        .restore_database(&dir.child("missing.db"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));

    assert_eq!(store.products().get_all().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_restore_rejects_foreign_database() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let (pool, store) = helpers::setup_sqlite(&dir).await?;
    let backup = SqliteBackup::new(pool, store.changes().clone());

    let other = aisleron::create_pool(
        &format!("sqlite:{}", dir.child("other.db").to_str().unwrap()),
        1,
    )
    .await?;
    sqlx::query("CREATE TABLE note (body TEXT)")
        .execute(&other)
        .await?;
    other.close().await;

    let err = backup
        .restore_database(&dir.child("other.db"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidBackup(_)));
    assert!(store.locations().get_home().await.is_ok());

    Ok(())
}
