//! Business transformation: acute-to-community reallocation

mod combined;
mod engine;

pub use combined::{CombinedActivityRecord, CombinedTable, ReallocationSummary};
pub use engine::{reallocate, ReallocationConfig, ReallocationEngine, DEFAULT_EFFECTIVE_YEAR};
