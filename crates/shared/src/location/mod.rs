use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

use crate::{Aisle, LiveQuery, Product, Repository, Result};

#[derive(
    EnumString,
    Display,
    VariantArray,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    Generic,
    #[default]
    Shop,
}

#[derive(
    EnumString,
    Display,
    VariantArray,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    AsRefStr,
)]
pub enum FilterType {
    #[strum(serialize = "INSTOCK")]
    #[serde(rename = "INSTOCK")]
    InStock,
    #[default]
    #[strum(serialize = "NEEDED")]
    #[serde(rename = "NEEDED")]
    Needed,
    #[strum(serialize = "ALL")]
    #[serde(rename = "ALL")]
    All,
}

impl FilterType {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            FilterType::InStock => product.in_stock,
            FilterType::Needed => !product.in_stock,
            FilterType::All => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    #[serde(rename = "type")]
    pub location_type: LocationType,
    pub default_filter: FilterType,
    pub name: String,
    pub pinned: bool,
    #[serde(default)]
    pub aisles: Vec<Aisle>,
}

impl Location {
    pub fn shop(name: impl Into<String>, default_filter: FilterType, pinned: bool) -> Self {
        Self {
            id: 0,
            location_type: LocationType::Shop,
            default_filter,
            name: name.into(),
            pinned,
            aisles: vec![],
        }
    }

    pub fn is_home(&self) -> bool {
        self.location_type == LocationType::Generic
    }

    pub fn default_aisle(&self) -> Option<&Aisle> {
        self.aisles.iter().find(|aisle| aisle.is_default)
    }

    /// Drops every aisle product that `filter` rejects, keeping empty aisles.
    pub fn filtered(mut self, filter: FilterType) -> Self {
        for aisle in self.aisles.iter_mut() {
            aisle
                .products
                .retain(|aisle_product| filter.matches(&aisle_product.product));
        }

        self
    }
}

#[async_trait::async_trait]
pub trait LocationRepository: Repository<Location> {
    fn get_shops(&self) -> LiveQuery<Vec<Location>>;

    fn get_pinned_shops(&self) -> LiveQuery<Vec<Location>>;

    /// The single [`LocationType::Generic`] location.
    ///
    /// Fails with [`crate::Error::HomeLocationMissing`] when the store has none.
    async fn get_home(&self) -> Result<Location>;

    /// Case-insensitive exact match.
    async fn get_by_name(&self, name: &str) -> Result<Option<Location>>;

    async fn get_by_type(&self, location_type: LocationType) -> Result<Vec<Location>>;

    async fn get_location_with_aisles(&self, id: i64) -> Result<Option<Location>>;

    /// Full aggregate, re-emitted whenever a location, aisle, product or
    /// placement changes.
    fn get_location_with_aisles_with_products(&self, id: i64) -> LiveQuery<Option<Location>>;
}
