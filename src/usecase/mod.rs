//! One struct per user action. Each holds the repositories it needs and
//! exposes a single `call`.

mod aisle;
mod backup;
mod location;
mod product;

pub use aisle::*;
pub use backup::*;
pub use location::*;
pub use product::*;
