use std::time::Duration;

use aisleron::usecase::{
    AddAisle, AddLocation, AddProduct, CreateDatabaseBackup, GetHomeLocation, GetPinnedShops,
    GetProducts, GetShoppingList, MoveAisleProduct, RemoveAisle, RemoveLocation, RemoveProduct,
    RemoveProductsFromAisle, RestoreDatabaseBackup, UpdateAisleProductRank, UpdateAisleProducts,
    UpdateProductStatus,
};
use aisleron_memory::{FakeDatabaseBackup, MemoryStore};
use aisleron_shared::{
    Aisle, AisleProductRepository, AisleRepository, Error, FilterType, Location,
    LocationRepository, Product, ProductRepository, Repository, Store,
};
use futures::StreamExt;

mod helpers;

fn add_location(store: &MemoryStore) -> AddLocation<
    aisleron_memory::MemoryLocationRepository,
    aisleron_memory::MemoryAisleRepository,
    aisleron_memory::MemoryProductRepository,
    aisleron_memory::MemoryAisleProductRepository,
> {
    AddLocation::new(
        store.locations().clone(),
        store.aisles().clone(),
        store.products().clone(),
        store.aisle_products().clone(),
    )
}

fn add_product(store: &MemoryStore) -> AddProduct<
    aisleron_memory::MemoryProductRepository,
    aisleron_memory::MemoryAisleRepository,
    aisleron_memory::MemoryAisleProductRepository,
> {
    AddProduct::new(
        store.products().clone(),
        store.aisles().clone(),
        store.aisle_products().clone(),
    )
}

#[tokio::test]
async fn test_add_aisle_returns_id() -> anyhow::Result<()> {
    let store = MemoryStore::new();

    let id = AddAisle::new(store.aisles().clone())
        .call(&Aisle::new("Dairy", 1, 1))
        .await?;

    let aisle = store.aisles().get(id).await?.unwrap();
    assert_eq!(aisle.name, "Dairy");
    assert!(!aisle.is_default);

    Ok(())
}

#[tokio::test]
async fn test_add_location_creates_default_aisle_with_products() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    store
        .products()
        .add_multiple(&[Product::new("Milk", false), Product::new("Bread", true)])
        .await?;

    let id = add_location(&store)
        .call(&Location::shop("Market", FilterType::Needed, false))
        .await?;

    let default = store.aisles().get_default_aisle_for(id).await?.unwrap();
    assert_eq!(default.name, "No Aisle");
    assert_eq!(default.rank, 0);

    let placed = store.aisle_products().get_by_aisle(default.id).await?;
    assert_eq!(helpers::names(&placed), vec!["Milk", "Bread"]);
    assert_eq!(placed.iter().map(|p| p.rank).collect::<Vec<_>>(), vec![1, 2]);

    Ok(())
}

#[tokio::test]
async fn test_add_location_duplicate_name_leaves_no_aisle() -> anyhow::Result<()> {
    let store = MemoryStore::new();

    let err = add_location(&store)
        .call(&Location::shop("HOME", FilterType::Needed, false))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DuplicateLocationName));
    assert_eq!(store.aisles().get_all().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_add_product_shelves_in_every_location() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let market = add_location(&store)
        .call(&Location::shop("Market", FilterType::Needed, false))
        .await?;
    let mut dairy = Aisle::new("Dairy", market, 1);
    dairy.id = store.aisles().add(&dairy).await?;

    let home_default = store.aisles().get_default_aisle_for(1).await?.unwrap();
    helpers::place(&store, &home_default, "Soap", 5).await?;

    let id = add_product(&store)
        .call(&Product::new("Milk", false), Some(&dairy))
        .await?;

    let placements = store.aisle_products().get_product_aisles(id).await?;
    assert_eq!(placements.len(), 2);

    let at_home = placements
        .iter()
        .find(|placement| placement.aisle_id == home_default.id)
        .unwrap();
    assert_eq!(at_home.rank, 6);

    let at_market = placements
        .iter()
        .find(|placement| placement.aisle_id == dairy.id)
        .unwrap();
    assert_eq!(at_market.rank, 1);

    let market_default = store.aisles().get_default_aisle_for(market).await?.unwrap();
    assert!(
        store
            .aisle_products()
            .get_by_aisle(market_default.id)
            .await?
            .is_empty()
    );

    Ok(())
}

#[tokio::test]
async fn test_add_product_duplicate_fails_without_placements() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    add_product(&store)
        .call(&Product::new("Milk", false), None)
        .await?;

    let err = add_product(&store)
        .call(&Product::new("milk", false), None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DuplicateProductName));
    assert_eq!(store.aisle_products().get_all().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_remove_aisle_moves_products_to_default() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let default = store.aisles().get_default_aisle_for(1).await?.unwrap();
    helpers::place(&store, &default, "Soap", 1).await?;

    let mut dairy = Aisle::new("Dairy", 1, 1);
    dairy.id = store.aisles().add(&dairy).await?;
    helpers::place(&store, &dairy, "Milk", 1).await?;
    helpers::place(&store, &dairy, "Cheese", 2).await?;

    let usecase = RemoveAisle::new(store.aisles().clone(), store.aisle_products().clone());
    usecase.call(&dairy).await?;

    assert!(store.aisles().get(dairy.id).await?.is_none());
    let products = store.aisle_products().get_by_aisle(default.id).await?;
    assert_eq!(helpers::names(&products), vec!["Soap", "Milk", "Cheese"]);
    assert_eq!(products.iter().map(|p| p.rank).collect::<Vec<_>>(), vec![1, 2, 3]);

    let err = usecase.call(&default).await.unwrap_err();
    assert!(matches!(err, Error::DeleteDefaultAisle));

    Ok(())
}

#[tokio::test]
async fn test_remove_products_from_aisle() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let default = store.aisles().get_default_aisle_for(1).await?.unwrap();
    helpers::place(&store, &default, "Soap", 1).await?;

    RemoveProductsFromAisle::new(store.aisle_products().clone())
        .call(&default)
        .await?;

    assert!(store.aisle_products().get_by_aisle(default.id).await?.is_empty());
    assert_eq!(store.products().get_all().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_update_aisle_products_and_rank() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let default = store.aisles().get_default_aisle_for(1).await?.unwrap();
    let mut milk = helpers::place(&store, &default, "Milk", 1).await?;
    let mut bread = helpers::place(&store, &default, "Bread", 2).await?;

    milk.rank = 20;
    bread.rank = 10;
    UpdateAisleProducts::new(store.aisle_products().clone())
        .call(&[milk.clone(), bread])
        .await?;
    let products = store.aisle_products().get_by_aisle(default.id).await?;
    assert_eq!(helpers::names(&products), vec!["Bread", "Milk"]);

    milk.rank = 10;
    UpdateAisleProductRank::new(store.aisle_products().clone())
        .call(&milk)
        .await?;
    let products = store.aisle_products().get_by_aisle(default.id).await?;
    assert_eq!(helpers::names(&products), vec!["Milk", "Bread"]);

    Ok(())
}

#[tokio::test]
async fn test_move_aisle_product() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let default = store.aisles().get_default_aisle_for(1).await?.unwrap();
    for (rank, name) in ["a", "b", "c", "d"].into_iter().enumerate() {
        helpers::place(&store, &default, name, rank as i32 + 1).await?;
    }

    let usecase = MoveAisleProduct::new(store.aisle_products().clone());
    usecase.call(default.id, 3, 1).await?;

    let products = store.aisle_products().get_by_aisle(default.id).await?;
    assert_eq!(helpers::names(&products), vec!["a", "d", "b", "c"]);
    assert_eq!(
        products.iter().map(|p| p.rank).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );

    // out of range is ignored
    usecase.call(default.id, 9, 0).await?;
    let unchanged = store.aisle_products().get_by_aisle(default.id).await?;
    assert_eq!(unchanged, products);

    Ok(())
}

#[tokio::test]
async fn test_get_products_sorted_by_name_ignoring_case() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    store
        .products()
        .add_multiple(&[
            Product::new("milk", false),
            Product::new("Bread", false),
            Product::new("apples", true),
        ])
        .await?;

    let products = GetProducts::new(store.products().clone()).call().await?;
    let names = products.iter().map(|p| p.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["apples", "Bread", "milk"]);

    Ok(())
}

#[tokio::test]
async fn test_update_product_status() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let id = store.products().add(&Product::new("Milk", false)).await?;

    let usecase = UpdateProductStatus::new(store.products().clone());
    let updated = usecase.call(id, true).await?.unwrap();
    assert!(updated.in_stock);
    assert!(store.products().get(id).await?.unwrap().in_stock);

    assert!(usecase.call(404, true).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_remove_product_and_location() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let market = add_location(&store)
        .call(&Location::shop("Market", FilterType::Needed, false))
        .await?;
    let milk = add_product(&store)
        .call(&Product::new("Milk", false), None)
        .await?;
    assert_eq!(store.aisle_products().get_product_aisles(milk).await?.len(), 2);

    let product = store.products().get(milk).await?.unwrap();
    RemoveProduct::new(store.products().clone(), store.aisle_products().clone())
        .call(&product)
        .await?;
    assert!(store.products().get(milk).await?.is_none());
    assert!(store.aisle_products().get_all().await?.is_empty());

    let location = store.locations().get(market).await?.unwrap();
    let usecase = RemoveLocation::new(store.locations().clone());
    usecase.call(&location).await?;
    assert!(store.locations().get(market).await?.is_none());
    assert!(store.aisles().get_for_location(market).await?.is_empty());

    let home = GetHomeLocation::new(store.locations().clone()).call().await?;
    let err = usecase.call(&home).await.unwrap_err();
    assert!(matches!(err, Error::DeleteHomeLocation));

    Ok(())
}

#[tokio::test]
async fn test_get_home_location_missing() -> anyhow::Result<()> {
    let store = MemoryStore::empty();

    let err = GetHomeLocation::new(store.locations().clone())
        .call()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HomeLocationMissing));

    Ok(())
}

#[tokio::test]
async fn test_get_pinned_shops_follows_updates() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let id = store
        .locations()
        .add(&Location::shop("Market", FilterType::Needed, false))
        .await?;

    let mut pinned = GetPinnedShops::new(store.locations().clone()).call();
    assert!(pinned.next().await.unwrap()?.is_empty());

    let mut market = store.locations().get(id).await?.unwrap();
    market.pinned = true;
    store.locations().update(&market).await?;

    let shops = tokio::time::timeout(Duration::from_secs(5), pinned.next())
        .await?
        .unwrap()?;
    assert_eq!(shops.len(), 1);
    assert_eq!(shops[0].name, "Market");

    Ok(())
}

#[tokio::test]
async fn test_get_shopping_list_reflects_status_changes() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let milk = add_product(&store)
        .call(&Product::new("Milk", false), None)
        .await?;

    let mut list = GetShoppingList::new(store.locations().clone()).call(1);
    let home = list.next().await.unwrap()?.unwrap();
    let needed = home.clone().filtered(home.default_filter);
    assert_eq!(helpers::names(&needed.aisles[0].products), vec!["Milk"]);

    UpdateProductStatus::new(store.products().clone())
        .call(milk, true)
        .await?;

    let home = tokio::time::timeout(Duration::from_secs(5), list.next())
        .await?
        .unwrap()?
        .unwrap();
    let needed = home.filtered(FilterType::Needed);
    assert!(needed.aisles[0].products.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_backup_usecases_use_timestamped_name() -> anyhow::Result<()> {
    let backup = FakeDatabaseBackup::new();

    let path = CreateDatabaseBackup::new(backup.clone())
        .call("backups".as_ref())
        .await?;
    let file_name = path.file_name().unwrap().to_str().unwrap().to_owned();
    assert!(file_name.starts_with("aisleron-backup-"));
    assert!(file_name.ends_with(".db"));
    // aisleron-backup-yyyyMMdd_HHmmss.db
    assert_eq!(file_name.len(), "aisleron-backup-".len() + 15 + ".db".len());

    RestoreDatabaseBackup::new(backup.clone())
        .call(&path)
        .await?;
    assert_eq!(backup.restores().await, vec![path]);

    let unnamed = FakeDatabaseBackup::unnamed();
    let path = CreateDatabaseBackup::new(unnamed).call("backups".as_ref()).await?;
    assert!(path.to_str().unwrap().contains("aisleron-backup-"));

    Ok(())
}
