use aisleron_shared::{
    Aisle, AisleProduct, AisleProductRepository, AisleRepository, LiveQuery, Location,
    LocationRepository, ProductRepository, Result,
};

/// Adds a location with its default aisle and shelves every known product there.
pub struct AddLocation<L, A, P, AP> {
    locations: L,
    aisles: A,
    products: P,
    aisle_products: AP,
}

impl<L, A, P, AP> AddLocation<L, A, P, AP>
where
    L: LocationRepository,
    A: AisleRepository,
    P: ProductRepository,
    AP: AisleProductRepository,
{
    pub fn new(locations: L, aisles: A, products: P, aisle_products: AP) -> Self {
        Self {
            locations,
            aisles,
            products,
            aisle_products,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn call(&self, location: &Location) -> Result<i64> {
        let id = self.locations.add(location).await?;
        let aisle_id = self.aisles.add(&Aisle::default_for(id)).await?;

        let placements = self
            .products
            .get_all()
            .await?
            .into_iter()
            .zip(1..)
            .map(|(product, rank)| AisleProduct {
                id: 0,
                aisle_id,
                rank,
                product,
            })
            .collect::<Vec<_>>();

        if !placements.is_empty() {
            self.aisle_products.add_multiple(&placements).await?;
        }

        Ok(id)
    }
}

pub struct RemoveLocation<L> {
    locations: L,
}

impl<L: LocationRepository> RemoveLocation<L> {
    pub fn new(locations: L) -> Self {
        Self { locations }
    }

    #[tracing::instrument(skip(self))]
    pub async fn call(&self, location: &Location) -> Result<()> {
        self.locations.remove(location).await
    }
}

pub struct GetHomeLocation<L> {
    locations: L,
}

impl<L: LocationRepository> GetHomeLocation<L> {
    pub fn new(locations: L) -> Self {
        Self { locations }
    }

    pub async fn call(&self) -> Result<Location> {
        self.locations.get_home().await
    }
}

pub struct GetShops<L> {
    locations: L,
}

impl<L: LocationRepository> GetShops<L> {
    pub fn new(locations: L) -> Self {
        Self { locations }
    }

    pub fn call(&self) -> LiveQuery<Vec<Location>> {
        self.locations.get_shops()
    }
}

pub struct GetPinnedShops<L> {
    locations: L,
}

impl<L: LocationRepository> GetPinnedShops<L> {
    pub fn new(locations: L) -> Self {
        Self { locations }
    }

    pub fn call(&self) -> LiveQuery<Vec<Location>> {
        self.locations.get_pinned_shops()
    }
}

/// The location aggregate with aisles and products, live.
pub struct GetShoppingList<L> {
    locations: L,
}

impl<L: LocationRepository> GetShoppingList<L> {
    pub fn new(locations: L) -> Self {
        Self { locations }
    }

    pub fn call(&self, location_id: i64) -> LiveQuery<Option<Location>> {
        self.locations
            .get_location_with_aisles_with_products(location_id)
    }
}
