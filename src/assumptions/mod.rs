//! Model assumptions: demographic growth and the community shift policy

mod growth;
mod shift;

pub use growth::GrowthTable;
pub use shift::AssumptionTable;
