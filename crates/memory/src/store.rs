use std::sync::Arc;

use aisleron_shared::{
    Aisle, AisleProduct, AisleProductRepository, AisleRepository, Changes, Error, FilterType, LiveQuery,
    Location, LocationRepository, LocationType, Product, ProductRepository, Repository, Result,
    Store, Table,
};
use tokio::sync::RwLock;

use crate::data::Data;

struct Shared {
    data: RwLock<Data>,
    changes: Changes,
}

impl Shared {
    async fn read<R>(&self, query: impl FnOnce(&Data) -> R) -> R {
        query(&*self.data.read().await)
    }

    /// Applies `apply` to a draft and keeps it only when it succeeds, so a
    /// failing batch leaves the data untouched.
    async fn write<R>(
        &self,
        tables: &[Table],
        apply: impl FnOnce(&mut Data) -> Result<(R, bool)>,
    ) -> Result<R> {
        let mut data = self.data.write().await;
        let mut draft = data.clone();
        let (value, changed) = apply(&mut draft)?;
        *data = draft;
        drop(data);

        if changed {
            self.changes.notify(tables);
        }

        Ok(value)
    }
}

/// All four repositories over one shared in-memory data set.
#[derive(Clone)]
pub struct MemoryStore {
    locations: MemoryLocationRepository,
    aisles: MemoryAisleRepository,
    products: MemoryProductRepository,
    aisle_products: MemoryAisleProductRepository,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// A store holding the home location and its default aisle, like a
    /// freshly migrated database.
    pub fn new() -> Self {
        let mut data = Data::default();
        let seeded = data
            .insert_location(&Location {
                location_type: LocationType::Generic,
                ..Location::shop("Home", FilterType::Needed, false)
            })
            .and_then(|home| data.insert_aisle(&Aisle::default_for(home)));

        if let Err(err) = seeded {
            tracing::error!(%err, "failed to seed memory store");
        }

        Self::with_data(data)
    }

    /// A store without any row, not even the home location.
    pub fn empty() -> Self {
        Self::with_data(Data::default())
    }

    fn with_data(data: Data) -> Self {
        let shared = Arc::new(Shared {
            data: RwLock::new(data),
            changes: Changes::new(),
        });

        Self {
            locations: MemoryLocationRepository(shared.clone()),
            aisles: MemoryAisleRepository(shared.clone()),
            products: MemoryProductRepository(shared.clone()),
            aisle_products: MemoryAisleProductRepository(shared),
        }
    }

    pub fn changes(&self) -> &Changes {
        &self.locations.0.changes
    }
}

impl Store for MemoryStore {
    type Locations = MemoryLocationRepository;
    type Aisles = MemoryAisleRepository;
    type Products = MemoryProductRepository;
    type AisleProducts = MemoryAisleProductRepository;

    fn locations(&self) -> &Self::Locations {
        &self.locations
    }

    fn aisles(&self) -> &Self::Aisles {
        &self.aisles
    }

    fn products(&self) -> &Self::Products {
        &self.products
    }

    fn aisle_products(&self) -> &Self::AisleProducts {
        &self.aisle_products
    }
}

#[derive(Clone)]
pub struct MemoryLocationRepository(Arc<Shared>);

#[derive(Clone)]
pub struct MemoryAisleRepository(Arc<Shared>);

#[derive(Clone)]
pub struct MemoryProductRepository(Arc<Shared>);

#[derive(Clone)]
pub struct MemoryAisleProductRepository(Arc<Shared>);

#[async_trait::async_trait]
impl Repository<Location> for MemoryLocationRepository {
    async fn get(&self, id: i64) -> Result<Option<Location>> {
        Ok(self.0.read(|data| data.location(id)).await)
    }

    async fn get_multiple(&self, ids: &[i64]) -> Result<Vec<Location>> {
        Ok(self
            .0
            .read(|data| {
                data.locations()
                    .into_iter()
                    .filter(|location| ids.contains(&location.id))
                    .collect()
            })
            .await)
    }

    async fn get_all(&self) -> Result<Vec<Location>> {
        Ok(self.0.read(Data::locations).await)
    }

    async fn add(&self, item: &Location) -> Result<i64> {
        self.0
            .write(&[Table::Location], |data| Ok((data.insert_location(item)?, true)))
            .await
    }

    async fn add_multiple(&self, items: &[Location]) -> Result<Vec<i64>> {
        self.0
            .write(&[Table::Location], |data| {
                let ids = items
                    .iter()
                    .map(|item| data.insert_location(item))
                    .collect::<Result<Vec<_>>>()?;
                Ok((ids, true))
            })
            .await
    }

    async fn update(&self, item: &Location) -> Result<()> {
        self.0
            .write(&[Table::Location], |data| Ok(((), data.update_location(item)?)))
            .await
    }

    async fn update_multiple(&self, items: &[Location]) -> Result<()> {
        self.0
            .write(&[Table::Location], |data| {
                let mut changed = false;
                for item in items {
                    changed |= data.update_location(item)?;
                }
                Ok(((), changed))
            })
            .await
    }

    async fn remove(&self, item: &Location) -> Result<()> {
        self.0
            .write(
                &[Table::Location, Table::Aisle, Table::AisleProduct],
                |data| Ok(((), data.remove_location(item.id)?)),
            )
            .await
    }
}

#[async_trait::async_trait]
impl LocationRepository for MemoryLocationRepository {
    fn get_shops(&self) -> LiveQuery<Vec<Location>> {
        let shared = self.0.clone();

        self.0.changes.watch(&[Table::Location], move || {
            let shared = shared.clone();
            async move { Ok(shared.read(|data| data.shops(false)).await) }
        })
    }

    fn get_pinned_shops(&self) -> LiveQuery<Vec<Location>> {
        let shared = self.0.clone();

        self.0.changes.watch(&[Table::Location], move || {
            let shared = shared.clone();
            async move { Ok(shared.read(|data| data.shops(true)).await) }
        })
    }

    async fn get_home(&self) -> Result<Location> {
        self.0
            .read(Data::home)
            .await
            .ok_or(Error::HomeLocationMissing)
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Location>> {
        Ok(self.0.read(|data| data.location_by_name(name)).await)
    }

    async fn get_by_type(&self, location_type: LocationType) -> Result<Vec<Location>> {
        Ok(self.0.read(|data| data.locations_by_type(location_type)).await)
    }

    async fn get_location_with_aisles(&self, id: i64) -> Result<Option<Location>> {
        Ok(self.0.read(|data| data.location_with_aisles(id, false)).await)
    }

    fn get_location_with_aisles_with_products(&self, id: i64) -> LiveQuery<Option<Location>> {
        let shared = self.0.clone();

        self.0.changes.watch(Table::ALL, move || {
            let shared = shared.clone();
            async move { Ok(shared.read(|data| data.location_with_aisles(id, true)).await) }
        })
    }
}

#[async_trait::async_trait]
impl Repository<Aisle> for MemoryAisleRepository {
    async fn get(&self, id: i64) -> Result<Option<Aisle>> {
        Ok(self.0.read(|data| data.aisle(id)).await)
    }

    async fn get_multiple(&self, ids: &[i64]) -> Result<Vec<Aisle>> {
        Ok(self.0.read(|data| data.aisles(|aisle| ids.contains(&aisle.id))).await)
    }

    async fn get_all(&self) -> Result<Vec<Aisle>> {
        Ok(self.0.read(|data| data.aisles(|_| true)).await)
    }

    async fn add(&self, item: &Aisle) -> Result<i64> {
        self.0
            .write(&[Table::Aisle], |data| Ok((data.insert_aisle(item)?, true)))
            .await
    }

    async fn add_multiple(&self, items: &[Aisle]) -> Result<Vec<i64>> {
        self.0
            .write(&[Table::Aisle], |data| {
                let ids = items
                    .iter()
                    .map(|item| data.insert_aisle(item))
                    .collect::<Result<Vec<_>>>()?;
                Ok((ids, true))
            })
            .await
    }

    async fn update(&self, item: &Aisle) -> Result<()> {
        self.0
            .write(&[Table::Aisle], |data| Ok(((), data.update_aisle(item)?)))
            .await
    }

    async fn update_multiple(&self, items: &[Aisle]) -> Result<()> {
        self.0
            .write(&[Table::Aisle], |data| {
                let mut changed = false;
                for item in items {
                    changed |= data.update_aisle(item)?;
                }
                Ok(((), changed))
            })
            .await
    }

    async fn remove(&self, item: &Aisle) -> Result<()> {
        self.0
            .write(&[Table::Aisle, Table::AisleProduct], |data| {
                Ok(((), data.remove_aisle(item.id)?))
            })
            .await
    }
}

#[async_trait::async_trait]
impl AisleRepository for MemoryAisleRepository {
    async fn get_for_location(&self, location_id: i64) -> Result<Vec<Aisle>> {
        Ok(self.0.read(|data| data.aisles_for_location(location_id)).await)
    }

    async fn get_for_location_with_products(&self, location_id: i64) -> Result<Vec<Aisle>> {
        Ok(self
            .0
            .read(|data| {
                data.aisles_for_location(location_id)
                    .into_iter()
                    .map(|aisle| Aisle {
                        products: data.placements_for_aisle(aisle.id),
                        ..aisle
                    })
                    .collect()
            })
            .await)
    }

    async fn get_default_aisles(&self) -> Result<Vec<Aisle>> {
        Ok(self.0.read(|data| data.aisles(|aisle| aisle.is_default)).await)
    }

    async fn get_default_aisle_for(&self, location_id: i64) -> Result<Option<Aisle>> {
        Ok(self
            .0
            .read(|data| {
                data.aisles(|aisle| aisle.location_id == location_id && aisle.is_default)
                    .into_iter()
                    .next()
            })
            .await)
    }

    async fn get_with_products(&self, aisle_id: i64) -> Result<Option<Aisle>> {
        Ok(self.0.read(|data| data.aisle_with_products(aisle_id)).await)
    }
}

#[async_trait::async_trait]
impl Repository<Product> for MemoryProductRepository {
    async fn get(&self, id: i64) -> Result<Option<Product>> {
        Ok(self.0.read(|data| data.product(id)).await)
    }

    async fn get_multiple(&self, ids: &[i64]) -> Result<Vec<Product>> {
        Ok(self
            .0
            .read(|data| {
                data.products()
                    .into_iter()
                    .filter(|product| ids.contains(&product.id))
                    .collect()
            })
            .await)
    }

    async fn get_all(&self) -> Result<Vec<Product>> {
        Ok(self.0.read(Data::products).await)
    }

    async fn add(&self, item: &Product) -> Result<i64> {
        self.0
            .write(&[Table::Product], |data| Ok((data.insert_product(item)?, true)))
            .await
    }

    async fn add_multiple(&self, items: &[Product]) -> Result<Vec<i64>> {
        self.0
            .write(&[Table::Product], |data| {
                let ids = items
                    .iter()
                    .map(|item| data.insert_product(item))
                    .collect::<Result<Vec<_>>>()?;
                Ok((ids, true))
            })
            .await
    }

    async fn update(&self, item: &Product) -> Result<()> {
        self.0
            .write(&[Table::Product], |data| Ok(((), data.update_product(item)?)))
            .await
    }

    async fn update_multiple(&self, items: &[Product]) -> Result<()> {
        self.0
            .write(&[Table::Product], |data| {
                let mut changed = false;
                for item in items {
                    changed |= data.update_product(item)?;
                }
                Ok(((), changed))
            })
            .await
    }

    async fn remove(&self, item: &Product) -> Result<()> {
        self.0
            .write(&[Table::Product, Table::AisleProduct], |data| {
                Ok(((), data.remove_product(item.id)))
            })
            .await
    }
}

#[async_trait::async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn get_by_name(&self, name: &str) -> Result<Option<Product>> {
        Ok(self.0.read(|data| data.product_by_name(name)).await)
    }

    async fn get_by_in_stock(&self, in_stock: bool) -> Result<Vec<Product>> {
        Ok(self
            .0
            .read(|data| {
                data.products()
                    .into_iter()
                    .filter(|product| product.in_stock == in_stock)
                    .collect()
            })
            .await)
    }
}

#[async_trait::async_trait]
impl Repository<AisleProduct> for MemoryAisleProductRepository {
    async fn get(&self, id: i64) -> Result<Option<AisleProduct>> {
        Ok(self.0.read(|data| data.placement(id)).await)
    }

    async fn get_multiple(&self, ids: &[i64]) -> Result<Vec<AisleProduct>> {
        Ok(self
            .0
            .read(|data| data.placements(|placement| ids.contains(&placement.id)))
            .await)
    }

    async fn get_all(&self) -> Result<Vec<AisleProduct>> {
        Ok(self.0.read(|data| data.placements(|_| true)).await)
    }

    async fn add(&self, item: &AisleProduct) -> Result<i64> {
        self.0
            .write(&[Table::AisleProduct], |data| {
                Ok((data.insert_placement(item)?, true))
            })
            .await
    }

    async fn add_multiple(&self, items: &[AisleProduct]) -> Result<Vec<i64>> {
        self.0
            .write(&[Table::AisleProduct], |data| {
                let ids = items
                    .iter()
                    .map(|item| data.insert_placement(item))
                    .collect::<Result<Vec<_>>>()?;
                Ok((ids, true))
            })
            .await
    }

    async fn update(&self, item: &AisleProduct) -> Result<()> {
        self.0
            .write(&[Table::AisleProduct], |data| {
                Ok(((), data.update_placement(item)?))
            })
            .await
    }

    async fn update_multiple(&self, items: &[AisleProduct]) -> Result<()> {
        self.0
            .write(&[Table::AisleProduct], |data| {
                let mut changed = false;
                for item in items {
                    changed |= data.update_placement(item)?;
                }
                Ok(((), changed))
            })
            .await
    }

    async fn remove(&self, item: &AisleProduct) -> Result<()> {
        self.0
            .write(&[Table::AisleProduct], |data| {
                Ok(((), data.remove_placement(item.id)))
            })
            .await
    }
}

#[async_trait::async_trait]
impl AisleProductRepository for MemoryAisleProductRepository {
    async fn get_by_aisle(&self, aisle_id: i64) -> Result<Vec<AisleProduct>> {
        Ok(self.0.read(|data| data.placements_for_aisle(aisle_id)).await)
    }

    async fn get_product_aisles(&self, product_id: i64) -> Result<Vec<AisleProduct>> {
        Ok(self
            .0
            .read(|data| data.placements(|placement| placement.product_id == product_id))
            .await)
    }

    async fn update_aisle_product_rank(&self, item: &AisleProduct) -> Result<()> {
        self.0
            .write(&[Table::AisleProduct], |data| {
                Ok(((), data.update_placement_rank(item)))
            })
            .await
    }

    async fn remove_products_from_aisle(&self, aisle_id: i64) -> Result<()> {
        self.0
            .write(&[Table::AisleProduct], |data| {
                Ok(((), data.remove_placements_from_aisle(aisle_id)))
            })
            .await
    }
}
