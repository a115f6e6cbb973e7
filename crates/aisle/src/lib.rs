mod aisle;
mod aisle_product;

pub use aisle::*;
pub use aisle_product::*;
