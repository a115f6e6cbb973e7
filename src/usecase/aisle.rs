use aisleron_shared::{
    Aisle, AisleProduct, AisleProductRepository, AisleRepository, Error, Result, move_to,
    next_rank,
};

pub struct AddAisle<A> {
    aisles: A,
}

impl<A: AisleRepository> AddAisle<A> {
    pub fn new(aisles: A) -> Self {
        Self { aisles }
    }

    #[tracing::instrument(skip(self))]
    pub async fn call(&self, aisle: &Aisle) -> Result<i64> {
        self.aisles.add(aisle).await
    }
}

/// Deletes an aisle after moving its products to the location's default aisle.
pub struct RemoveAisle<A, P> {
    aisles: A,
    aisle_products: P,
}

impl<A: AisleRepository, P: AisleProductRepository> RemoveAisle<A, P> {
    pub fn new(aisles: A, aisle_products: P) -> Self {
        Self {
            aisles,
            aisle_products,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn call(&self, aisle: &Aisle) -> Result<()> {
        let Some(stored) = self.aisles.get(aisle.id).await? else {
            return Ok(());
        };

        if stored.is_default {
            return Err(Error::DeleteDefaultAisle);
        }

        if let Some(default) = self.aisles.get_default_aisle_for(stored.location_id).await? {
            let existing = self.aisle_products.get_by_aisle(default.id).await?;
            let start = next_rank(&existing);
            let moved = self
                .aisle_products
                .get_by_aisle(stored.id)
                .await?
                .into_iter()
                .zip(start..)
                .map(|(aisle_product, rank)| AisleProduct {
                    aisle_id: default.id,
                    rank,
                    ..aisle_product
                })
                .collect::<Vec<_>>();

            if !moved.is_empty() {
                tracing::debug!(count = moved.len(), to = default.id, "moving products to default aisle");
                self.aisle_products.update_multiple(&moved).await?;
            }
        }

        self.aisles.remove(&stored).await
    }
}

pub struct RemoveProductsFromAisle<P> {
    aisle_products: P,
}

impl<P: AisleProductRepository> RemoveProductsFromAisle<P> {
    pub fn new(aisle_products: P) -> Self {
        Self { aisle_products }
    }

    #[tracing::instrument(skip(self, aisle), fields(aisle.id = aisle.id))]
    pub async fn call(&self, aisle: &Aisle) -> Result<()> {
        self.aisle_products.remove_products_from_aisle(aisle.id).await
    }
}

pub struct UpdateAisleProducts<P> {
    aisle_products: P,
}

impl<P: AisleProductRepository> UpdateAisleProducts<P> {
    pub fn new(aisle_products: P) -> Self {
        Self { aisle_products }
    }

    #[tracing::instrument(skip_all, fields(count = aisle_products.len()))]
    pub async fn call(&self, aisle_products: &[AisleProduct]) -> Result<()> {
        self.aisle_products.update_multiple(aisle_products).await
    }
}

pub struct UpdateAisleProductRank<P> {
    aisle_products: P,
}

impl<P: AisleProductRepository> UpdateAisleProductRank<P> {
    pub fn new(aisle_products: P) -> Self {
        Self { aisle_products }
    }

    #[tracing::instrument(skip(self))]
    pub async fn call(&self, aisle_product: &AisleProduct) -> Result<()> {
        self.aisle_products
            .update_aisle_product_rank(aisle_product)
            .await
    }
}

/// Drag and drop inside an aisle: positions are indexes in display order.
pub struct MoveAisleProduct<P> {
    aisle_products: P,
}

impl<P: AisleProductRepository> MoveAisleProduct<P> {
    pub fn new(aisle_products: P) -> Self {
        Self { aisle_products }
    }

    #[tracing::instrument(skip(self))]
    pub async fn call(&self, aisle_id: i64, from: usize, to: usize) -> Result<()> {
        let items = self.aisle_products.get_by_aisle(aisle_id).await?;
        let changed = move_to(items, from, to);
        if changed.is_empty() {
            return Ok(());
        }

        self.aisle_products.update_multiple(&changed).await
    }
}
