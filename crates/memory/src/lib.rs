//! In-memory store used by tests and previews. Behaves like the SQLite store,
//! including name uniqueness, the home and default aisle rules and live queries.

mod backup;
mod data;
mod store;

pub use backup::*;
pub use store::*;
