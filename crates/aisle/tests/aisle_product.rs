use aisleron_shared::{Aisle, AisleProduct, AisleProductRepository, Repository, Table};
use helpers::{HOME_DEFAULT_AISLE_ID, HOME_ID};
use temp_dir::TempDir;

mod helpers;

fn names(products: &[aisleron_shared::AisleProduct]) -> Vec<&str> {
    products
        .iter()
        .map(|aisle_product| aisle_product.product.name.as_str())
        .collect()
}

#[tokio::test]
async fn test_get_by_aisle_orders_by_rank() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;

    state.place(HOME_DEFAULT_AISLE_ID, "Milk", 3).await?;
    state.place(HOME_DEFAULT_AISLE_ID, "Bread", 1).await?;
    state.place(HOME_DEFAULT_AISLE_ID, "Eggs", 2).await?;

    let products = state.aisle_products.get_by_aisle(HOME_DEFAULT_AISLE_ID).await?;
    assert_eq!(names(&products), vec!["Bread", "Eggs", "Milk"]);

    Ok(())
}

#[tokio::test]
async fn test_update_rank_moves_product_ahead() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;

    state.place(HOME_DEFAULT_AISLE_ID, "p1", 0).await?;
    let mut p2 = state.place(HOME_DEFAULT_AISLE_ID, "p2", 1).await?;

    p2.rank = 0;
    state.aisle_products.update_aisle_product_rank(&p2).await?;

    let products = state.aisle_products.get_by_aisle(HOME_DEFAULT_AISLE_ID).await?;
    assert_eq!(names(&products), vec!["p2", "p1"]);
    assert_eq!(products[0].rank, 0);
    assert_eq!(products[1].rank, 1);

    Ok(())
}

#[tokio::test]
async fn test_update_rank_leaves_other_aisles_alone() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;

    let dairy = state.aisles.add(&Aisle::new("Dairy", HOME_ID, 1)).await?;
    let cheese = state.place(dairy, "Cheese", 1).await?;
    let mut milk = state.place(HOME_DEFAULT_AISLE_ID, "Milk", 2).await?;

    milk.rank = 1;
    state.aisle_products.update_aisle_product_rank(&milk).await?;

    let stored = state.aisle_products.get(cheese.id).await?.unwrap();
    assert_eq!(stored.rank, 1);

    Ok(())
}

#[tokio::test]
async fn test_remove_products_from_aisle() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;

    let dairy = state.aisles.add(&Aisle::new("Dairy", HOME_ID, 1)).await?;
    state.place(dairy, "Milk", 1).await?;
    state.place(dairy, "Cheese", 2).await?;
    let soap = state.place(HOME_DEFAULT_AISLE_ID, "Soap", 1).await?;

    state.aisle_products.remove_products_from_aisle(dairy).await?;

    assert!(state.aisle_products.get_by_aisle(dairy).await?.is_empty());
    assert!(state.aisles.get(dairy).await?.is_some());
    assert!(state.aisle_products.get(soap.id).await?.is_some());

    Ok(())
}

#[tokio::test]
async fn test_get_product_aisles() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;

    let dairy = state.aisles.add(&Aisle::new("Dairy", HOME_ID, 1)).await?;
    let milk = state.place(HOME_DEFAULT_AISLE_ID, "Milk", 1).await?;
    let mut second = milk.clone();
    second.aisle_id = dairy;
    state.aisle_products.add(&second).await?;

    let placements = state.aisle_products.get_product_aisles(milk.product.id).await?;
    let aisles = placements
        .iter()
        .map(|aisle_product| aisle_product.aisle_id)
        .collect::<Vec<_>>();
    assert_eq!(aisles.len(), 2);
    assert!(aisles.contains(&HOME_DEFAULT_AISLE_ID));
    assert!(aisles.contains(&dairy));

    Ok(())
}

#[tokio::test]
async fn test_writes_notify_aisle_product_table() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let mut receiver = state.changes.subscribe();

    let milk = state.place(HOME_DEFAULT_AISLE_ID, "Milk", 1).await?;
    assert_eq!(receiver.recv().await?, Table::Product);
    assert_eq!(receiver.recv().await?, Table::AisleProduct);

    state.aisle_products.remove(&milk).await?;
    assert_eq!(receiver.recv().await?, Table::AisleProduct);

    // nothing left to delete, nothing published
    state.aisle_products.remove(&milk).await?;
    assert!(receiver.try_recv().is_err());

    Ok(())
}

#[tokio::test]
async fn test_update_rank_of_unknown_placement_changes_nothing() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;

    let p1 = state.place(HOME_DEFAULT_AISLE_ID, "p1", 0).await?;
    let mut receiver = state.changes.subscribe();

    let ghost = AisleProduct {
        id: 999,
        rank: 0,
        ..p1.clone()
    };
    state.aisle_products.update_aisle_product_rank(&ghost).await?;

    let products = state.aisle_products.get_by_aisle(HOME_DEFAULT_AISLE_ID).await?;
    assert_eq!(products, vec![p1]);
    assert!(receiver.try_recv().is_err());

    Ok(())
}

#[tokio::test]
async fn test_update_rank_shifts_the_stored_aisle() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;

    let dairy = state.aisles.add(&Aisle::new("Dairy", HOME_ID, 1)).await?;
    let cheese = state.place(dairy, "Cheese", 0).await?;
    state.place(HOME_DEFAULT_AISLE_ID, "p1", 0).await?;
    let p2 = state.place(HOME_DEFAULT_AISLE_ID, "p2", 1).await?;

    // a stale aisle id on the caller's copy must not shift Dairy
    let moved = AisleProduct {
        aisle_id: dairy,
        rank: 0,
        ..p2
    };
    state.aisle_products.update_aisle_product_rank(&moved).await?;

    assert_eq!(state.aisle_products.get(cheese.id).await?.unwrap().rank, 0);
    let products = state.aisle_products.get_by_aisle(HOME_DEFAULT_AISLE_ID).await?;
    assert_eq!(names(&products), vec!["p2", "p1"]);

    Ok(())
}
