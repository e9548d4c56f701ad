//! Activity data structures and historic activity tables

mod data;
mod table;

pub use data::{ActivityRecord, DimensionKey, Domain};
pub use table::{ActivityTable, PROVIDER_COLUMNS};
