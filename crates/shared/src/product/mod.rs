use serde::{Deserialize, Serialize};

use crate::{Repository, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub in_stock: bool,
}

impl Product {
    pub fn new(name: impl Into<String>, in_stock: bool) -> Self {
        Self {
            id: 0,
            name: name.into(),
            in_stock,
        }
    }
}

#[async_trait::async_trait]
pub trait ProductRepository: Repository<Product> {
    /// Case-insensitive exact match.
    async fn get_by_name(&self, name: &str) -> Result<Option<Product>>;

    async fn get_by_in_stock(&self, in_stock: bool) -> Result<Vec<Product>>;
}
