//! Healthcare Model - activity forecasting and acute-to-community reallocation
//!
//! This library provides:
//! - CSV loading of historic activity, growth rates and shift assumptions
//! - Compounded demographic forecasts per delivery setting
//! - Outer-joined acute/community tables with a dated community shift
//! - A lazily evaluated task graph that runs independent stages in parallel

pub mod activity;
pub mod assumptions;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod projection;
pub mod reallocation;
pub mod source;

// Re-export commonly used types
pub use activity::{ActivityRecord, ActivityTable, DimensionKey, Domain};
pub use assumptions::{AssumptionTable, GrowthTable};
pub use config::ModelConfig;
pub use error::{ModelError, Result};
pub use projection::{ForecastEngine, ForecastTable};
pub use reallocation::{CombinedActivityRecord, CombinedTable, ReallocationEngine};
