use aisleron::Config;
use aisleron::usecase::{
    AddAisle, AddLocation, GetHomeLocation, GetPinnedShops, GetShoppingList, GetShops,
};
use aisleron_shared::{Aisle, AisleRepository, FilterType, Location, Store, next_rank};
use clap::ValueEnum;
use futures::StreamExt;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Filter {
    Instock,
    Needed,
    All,
}

impl From<Filter> for FilterType {
    fn from(filter: Filter) -> Self {
        match filter {
            Filter::Instock => FilterType::InStock,
            Filter::Needed => FilterType::Needed,
            Filter::All => FilterType::All,
        }
    }
}

pub async fn shops(config: Config, pinned: bool) -> anyhow::Result<()> {
    let (_, store) = super::open(&config).await?;

    let mut shops = if pinned {
        GetPinnedShops::new(store.locations().clone()).call()
    } else {
        GetShops::new(store.locations().clone()).call()
    };

    let Some(shops) = shops.next().await.transpose()? else {
        return Ok(());
    };

    for shop in shops {
        let pin = if shop.pinned { "*" } else { " " };
        println!("{pin} {:>4}  {}", shop.id, shop.name);
    }

    Ok(())
}

pub async fn list(
    config: Config,
    location_id: Option<i64>,
    filter: Option<Filter>,
) -> anyhow::Result<()> {
    let (_, store) = super::open(&config).await?;

    let location_id = match location_id {
        Some(id) => id,
        None => GetHomeLocation::new(store.locations().clone()).call().await?.id,
    };

    let mut list = GetShoppingList::new(store.locations().clone()).call(location_id);
    let Some(location) = list.next().await.transpose()?.flatten() else {
        tracing::error!("location {location_id} not found");
        return Ok(());
    };

    let filter = filter.map(FilterType::from).unwrap_or(location.default_filter);
    let location = location.filtered(filter);

    println!("{} ({filter})", location.name);
    for aisle in location.aisles {
        println!();
        println!("  {}", aisle.name);
        for aisle_product in aisle.products {
            let mark = if aisle_product.product.in_stock { "x" } else { " " };
            println!(
                "    [{mark}] {:>4}  {}",
                aisle_product.product.id, aisle_product.product.name
            );
        }
    }

    Ok(())
}

pub async fn add_shop(config: Config, name: String, pinned: bool) -> anyhow::Result<()> {
    let (_, store) = super::open(&config).await?;
    let usecase = AddLocation::new(
        store.locations().clone(),
        store.aisles().clone(),
        store.products().clone(),
        store.aisle_products().clone(),
    );

    let id = usecase
        .call(&Location::shop(name, FilterType::Needed, pinned))
        .await?;

    println!("{id}");

    Ok(())
}

pub async fn add_aisle(config: Config, location_id: i64, name: String) -> anyhow::Result<()> {
    let (_, store) = super::open(&config).await?;

    let aisles = store.aisles().get_for_location(location_id).await?;
    let rank = next_rank(&aisles);
    let id = AddAisle::new(store.aisles().clone())
        .call(&Aisle::new(name, location_id, rank))
        .await?;

    println!("{id}");

    Ok(())
}
