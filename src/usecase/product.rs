use aisleron_shared::{
    Aisle, AisleProduct, AisleProductRepository, AisleRepository, Product, ProductRepository,
    Result, next_rank,
};

/// Adds a product and shelves it in every location: in `target` for the
/// location owning it, in the default aisle everywhere else.
pub struct AddProduct<P, A, AP> {
    products: P,
    aisles: A,
    aisle_products: AP,
}

impl<P, A, AP> AddProduct<P, A, AP>
where
    P: ProductRepository,
    A: AisleRepository,
    AP: AisleProductRepository,
{
    pub fn new(products: P, aisles: A, aisle_products: AP) -> Self {
        Self {
            products,
            aisles,
            aisle_products,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn call(&self, product: &Product, target: Option<&Aisle>) -> Result<i64> {
        let id = self.products.add(product).await?;
        let product = Product {
            id,
            ..product.clone()
        };

        let mut aisles = self
            .aisles
            .get_default_aisles()
            .await?
            .into_iter()
            .filter(|aisle| target.is_none_or(|target| target.location_id != aisle.location_id))
            .collect::<Vec<_>>();
        aisles.extend(target.cloned());

        let mut placements = Vec::with_capacity(aisles.len());
        for aisle in aisles {
            let existing = self.aisle_products.get_by_aisle(aisle.id).await?;
            placements.push(AisleProduct {
                id: 0,
                aisle_id: aisle.id,
                rank: next_rank(&existing),
                product: product.clone(),
            });
        }

        self.aisle_products.add_multiple(&placements).await?;

        Ok(id)
    }
}

/// Removes the product's placements, then the product.
pub struct RemoveProduct<P, AP> {
    products: P,
    aisle_products: AP,
}

impl<P: ProductRepository, AP: AisleProductRepository> RemoveProduct<P, AP> {
    pub fn new(products: P, aisle_products: AP) -> Self {
        Self {
            products,
            aisle_products,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn call(&self, product: &Product) -> Result<()> {
        for aisle_product in self.aisle_products.get_product_aisles(product.id).await? {
            self.aisle_products.remove(&aisle_product).await?;
        }

        self.products.remove(product).await
    }
}

pub struct UpdateProductStatus<P> {
    products: P,
}

impl<P: ProductRepository> UpdateProductStatus<P> {
    pub fn new(products: P) -> Self {
        Self { products }
    }

    /// Returns the updated product, `None` when `id` is unknown.
    #[tracing::instrument(skip(self))]
    pub async fn call(&self, id: i64, in_stock: bool) -> Result<Option<Product>> {
        let Some(mut product) = self.products.get(id).await? else {
            return Ok(None);
        };

        product.in_stock = in_stock;
        self.products.update(&product).await?;

        Ok(Some(product))
    }
}

pub struct GetProducts<P> {
    products: P,
}

impl<P: ProductRepository> GetProducts<P> {
    pub fn new(products: P) -> Self {
        Self { products }
    }

    /// Every product, sorted by name ignoring case.
    pub async fn call(&self) -> Result<Vec<Product>> {
        let mut products = self.products.get_all().await?;
        products.sort_by_cached_key(|product| product.name.to_lowercase());

        Ok(products)
    }
}
