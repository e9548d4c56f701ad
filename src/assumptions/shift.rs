//! Share of acute activity moved to community services, by service line

use crate::error::{ModelError, Result};
use crate::source::RawTable;
use serde::Deserialize;
use std::collections::HashMap;

/// Raw CSV row of the assumptions file
#[derive(Debug, Deserialize)]
struct AssumptionRow {
    service_line: String,
    percentage_shift_to_community: Option<f64>,
}

/// Percentage shift to community by service line
///
/// Ratios are fractions in `[0, 1]`. A row whose ratio cell is missing is
/// kept as an unset ratio and behaves like a service line with no row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssumptionTable {
    shifts: HashMap<String, Option<f64>>,
}

impl AssumptionTable {
    /// Create from `(service_line, ratio)` pairs
    pub fn new<I, S>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut shifts = HashMap::new();
        for (service_line, ratio) in rows {
            let service_line = service_line.into();
            check_ratio("assumptions", &service_line, ratio)?;
            if shifts.insert(service_line.clone(), Some(ratio)).is_some() {
                return Err(duplicate("assumptions", &service_line));
            }
        }
        Ok(Self { shifts })
    }

    /// Convert a loaded CSV table
    pub fn from_raw(raw: &RawTable) -> Result<Self> {
        raw.require_columns(&["service_line", "percentage_shift_to_community"])?;

        let mut shifts = HashMap::with_capacity(raw.len());
        for row in raw.deserialize::<AssumptionRow>()? {
            if let Some(ratio) = row.percentage_shift_to_community {
                check_ratio(&raw.name, &row.service_line, ratio)?;
            }
            if shifts
                .insert(row.service_line.clone(), row.percentage_shift_to_community)
                .is_some()
            {
                return Err(duplicate(&raw.name, &row.service_line));
            }
        }

        Ok(Self { shifts })
    }

    /// Shift ratio for a service line; `None` when absent or unset
    pub fn shift_for(&self, service_line: &str) -> Option<f64> {
        self.shifts.get(service_line).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }
}

fn check_ratio(table: &str, service_line: &str, ratio: f64) -> Result<()> {
    if (0.0..=1.0).contains(&ratio) {
        Ok(())
    } else {
        Err(ModelError::schema(
            table,
            format!(
                "percentage_shift_to_community {} for '{}' is outside [0, 1]",
                ratio, service_line
            ),
        ))
    }
}

fn duplicate(table: &str, service_line: &str) -> ModelError {
    ModelError::schema(table, format!("duplicate service line '{}'", service_line))
}
