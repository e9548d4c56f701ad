//! Forecast engine projecting base-year activity with demographic growth

mod engine;
mod forecast;

pub use engine::{compound, project, ForecastConfig, ForecastEngine, DEFAULT_BASE_YEAR};
pub use forecast::ForecastTable;
