use serde::{Deserialize, Serialize};

use crate::{Product, Ranked, Repository, Result};

/// Name given to the default aisle created with every location.
pub const DEFAULT_AISLE_NAME: &str = "No Aisle";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AisleProduct {
    pub id: i64,
    pub aisle_id: i64,
    pub rank: i32,
    pub product: Product,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aisle {
    pub id: i64,
    pub name: String,
    pub location_id: i64,
    pub rank: i32,
    pub is_default: bool,
    #[serde(default)]
    pub products: Vec<AisleProduct>,
}

impl Aisle {
    pub fn new(name: impl Into<String>, location_id: i64, rank: i32) -> Self {
        Self {
            id: 0,
            name: name.into(),
            location_id,
            rank,
            is_default: false,
            products: vec![],
        }
    }

    pub fn default_for(location_id: i64) -> Self {
        Self {
            is_default: true,
            ..Self::new(DEFAULT_AISLE_NAME, location_id, 0)
        }
    }

    /// Rank a product appended to this aisle should get.
    pub fn next_product_rank(&self) -> i32 {
        crate::next_rank(&self.products)
    }
}

impl Ranked for Aisle {
    fn id(&self) -> i64 {
        self.id
    }

    fn rank(&self) -> i32 {
        self.rank
    }

    fn set_rank(&mut self, rank: i32) {
        self.rank = rank;
    }
}

impl Ranked for AisleProduct {
    fn id(&self) -> i64 {
        self.id
    }

    fn rank(&self) -> i32 {
        self.rank
    }

    fn set_rank(&mut self, rank: i32) {
        self.rank = rank;
    }
}

#[async_trait::async_trait]
pub trait AisleRepository: Repository<Aisle> {
    /// Aisles of a location ordered by rank, without products.
    async fn get_for_location(&self, location_id: i64) -> Result<Vec<Aisle>>;

    /// Aisles of a location ordered by rank, each with its products ordered by rank.
    async fn get_for_location_with_products(&self, location_id: i64) -> Result<Vec<Aisle>>;

    async fn get_default_aisles(&self) -> Result<Vec<Aisle>>;

    async fn get_default_aisle_for(&self, location_id: i64) -> Result<Option<Aisle>>;

    async fn get_with_products(&self, aisle_id: i64) -> Result<Option<Aisle>>;
}

#[async_trait::async_trait]
pub trait AisleProductRepository: Repository<AisleProduct> {
    /// Placements of an aisle ordered by rank, ties broken by id.
    async fn get_by_aisle(&self, aisle_id: i64) -> Result<Vec<AisleProduct>>;

    async fn get_product_aisles(&self, product_id: i64) -> Result<Vec<AisleProduct>>;

    /// Writes `item.rank`, first shifting every other placement of the aisle
    /// ranked at or after it down by one.
    async fn update_aisle_product_rank(&self, item: &AisleProduct) -> Result<()>;

    async fn remove_products_from_aisle(&self, aisle_id: i64) -> Result<()>;
}
