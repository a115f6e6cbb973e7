pub mod aisle;
mod backup;
mod error;
mod live;
pub mod location;
pub mod product;
mod rank;
mod repository;

pub use aisle::{Aisle, AisleProduct, AisleProductRepository, AisleRepository, DEFAULT_AISLE_NAME};
pub use backup::*;
pub use error::*;
pub use live::*;
pub use location::{FilterType, Location, LocationRepository, LocationType};
pub use product::{Product, ProductRepository};
pub use rank::*;
pub use repository::*;

/// File name of the application database.
pub const DATABASE_NAME: &str = "aisleron.db";

#[doc(hidden)]
pub mod __private {
    pub use anyhow::anyhow;
}
