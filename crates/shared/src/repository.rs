use crate::{AisleProductRepository, AisleRepository, LocationRepository, ProductRepository, Result};

/// CRUD contract shared by every entity repository.
///
/// `update` of an id that does not exist is a silent no-op, as is `remove`
/// of an item that is not stored.
#[async_trait::async_trait]
pub trait Repository<T: Send + Sync>: Send + Sync {
    async fn get(&self, id: i64) -> Result<Option<T>>;

    /// Missing ids are left out of the result.
    async fn get_multiple(&self, ids: &[i64]) -> Result<Vec<T>>;

    async fn get_all(&self) -> Result<Vec<T>>;

    /// Inserts `item` and returns the generated id; `item`'s own id is ignored.
    async fn add(&self, item: &T) -> Result<i64>;

    /// Inserts every item in one batch. Nothing is stored if any insert fails.
    async fn add_multiple(&self, items: &[T]) -> Result<Vec<i64>>;

    async fn update(&self, item: &T) -> Result<()>;

    async fn update_multiple(&self, items: &[T]) -> Result<()>;

    async fn remove(&self, item: &T) -> Result<()>;
}

/// Bundle of repositories a use-case can be built from.
///
/// Implemented once over SQLite and once in memory; the caller picks one
/// when wiring the application.
pub trait Store: Clone + Send + Sync + 'static {
    type Locations: LocationRepository + Clone + 'static;
    type Aisles: AisleRepository + Clone + 'static;
    type Products: ProductRepository + Clone + 'static;
    type AisleProducts: AisleProductRepository + Clone + 'static;

    fn locations(&self) -> &Self::Locations;
    fn aisles(&self) -> &Self::Aisles;
    fn products(&self) -> &Self::Products;
    fn aisle_products(&self) -> &Self::AisleProducts;
}
