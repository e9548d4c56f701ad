//! Values produced by graph nodes

use crate::activity::ActivityTable;
use crate::assumptions::{AssumptionTable, GrowthTable};
use crate::error::{ModelError, Result};
use crate::projection::ForecastTable;
use crate::reallocation::CombinedTable;

/// Output of a single node
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Activity(ActivityTable),
    Growth(GrowthTable),
    Assumptions(AssumptionTable),
    Forecast(ForecastTable),
    Combined(CombinedTable),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Activity(_) => "activity table",
            Value::Growth(_) => "growth table",
            Value::Assumptions(_) => "assumption table",
            Value::Forecast(_) => "forecast table",
            Value::Combined(_) => "combined table",
        }
    }

    pub fn as_activity(&self) -> Result<&ActivityTable> {
        match self {
            Value::Activity(t) => Ok(t),
            other => Err(mismatch("activity table", other)),
        }
    }

    pub fn as_growth(&self) -> Result<&GrowthTable> {
        match self {
            Value::Growth(t) => Ok(t),
            other => Err(mismatch("growth table", other)),
        }
    }

    pub fn as_assumptions(&self) -> Result<&AssumptionTable> {
        match self {
            Value::Assumptions(t) => Ok(t),
            other => Err(mismatch("assumption table", other)),
        }
    }

    pub fn as_forecast(&self) -> Result<&ForecastTable> {
        match self {
            Value::Forecast(t) => Ok(t),
            other => Err(mismatch("forecast table", other)),
        }
    }

    pub fn as_combined(&self) -> Result<&CombinedTable> {
        match self {
            Value::Combined(t) => Ok(t),
            other => Err(mismatch("combined table", other)),
        }
    }

    /// Row count, for logging
    pub fn rows(&self) -> usize {
        match self {
            Value::Activity(t) => t.len(),
            Value::Growth(t) => t.age_bands().count(),
            Value::Assumptions(t) => t.len(),
            Value::Forecast(t) => t.len(),
            Value::Combined(t) => t.len(),
        }
    }
}

fn mismatch(expected: &str, found: &Value) -> ModelError {
    ModelError::Pipeline(format!("expected {}, found {}", expected, found.kind()))
}
