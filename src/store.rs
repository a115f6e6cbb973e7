use aisleron_aisle::{SqliteAisleProductRepository, SqliteAisleRepository};
use aisleron_location::SqliteLocationRepository;
use aisleron_product::SqliteProductRepository;
use aisleron_shared::{Changes, Store};
use sqlx::SqlitePool;

/// The four SQLite repositories sharing one pool and one change log.
#[derive(Clone)]
pub struct SqliteStore {
    changes: Changes,
    locations: SqliteLocationRepository,
    aisles: SqliteAisleRepository,
    products: SqliteProductRepository,
    aisle_products: SqliteAisleProductRepository,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_changes(pool, Changes::new())
    }

    pub fn with_changes(pool: SqlitePool, changes: Changes) -> Self {
        Self {
            locations: SqliteLocationRepository::new(pool.clone(), changes.clone()),
            aisles: SqliteAisleRepository::new(pool.clone(), changes.clone()),
            products: SqliteProductRepository::new(pool.clone(), changes.clone()),
            aisle_products: SqliteAisleProductRepository::new(pool, changes.clone()),
            changes,
        }
    }

    pub fn changes(&self) -> &Changes {
        &self.changes
    }
}

impl Store for SqliteStore {
    type Locations = SqliteLocationRepository;
    type Aisles = SqliteAisleRepository;
    type Products = SqliteProductRepository;
    type AisleProducts = SqliteAisleProductRepository;

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
