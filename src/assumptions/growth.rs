//! Annual population growth rates by five-year age band
//!
//! Rate columns are read in file order; the position of a column, not its
//! header, decides which forecast year it applies to.

use crate::error::{ModelError, Result};
use crate::source::RawTable;
use std::collections::HashMap;

/// Growth rates by age band over an ordered forecast horizon
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthTable {
    /// Rate column headers, in horizon order
    labels: Vec<String>,

    /// Fractional annual growth by age band, one entry per horizon year
    rates: HashMap<String, Vec<f64>>,
}

impl GrowthTable {
    /// Create from in-memory rates
    ///
    /// Every rate vector must have one entry per label.
    pub fn new(labels: Vec<String>, rates: HashMap<String, Vec<f64>>) -> Result<Self> {
        if labels.is_empty() {
            return Err(ModelError::schema("growth", "no forecast year columns"));
        }
        if let Some((band, r)) = rates.iter().find(|(_, r)| r.len() != labels.len()) {
            return Err(ModelError::schema(
                "growth",
                format!(
                    "age band '{}' has {} rates, expected {}",
                    band,
                    r.len(),
                    labels.len()
                ),
            ));
        }
        if let Some(band) = rates
            .iter()
            .find(|(_, r)| r.iter().any(|rate| !rate.is_finite()))
            .map(|(band, _)| band)
        {
            return Err(ModelError::schema(
                "growth",
                format!("age band '{}' has a non-finite rate", band),
            ));
        }
        Ok(Self { labels, rates })
    }

    /// Build from `(age_band, rates)` rows with year-like labels
    pub fn from_rows(labels: &[&str], rows: Vec<(&str, Vec<f64>)>) -> Result<Self> {
        let rates = rows
            .into_iter()
            .map(|(band, r)| (band.to_string(), r))
            .collect();
        Self::new(labels.iter().map(|l| l.to_string()).collect(), rates)
    }

    /// Convert a loaded CSV table
    ///
    /// The `age_band` column is the key; every other column is a rate column.
    pub fn from_raw(raw: &RawTable) -> Result<Self> {
        let key_col = raw.column("age_band")?;
        let rate_cols: Vec<usize> = (0..raw.headers.len()).filter(|&c| c != key_col).collect();

        if rate_cols.is_empty() {
            return Err(ModelError::schema(&raw.name, "no forecast year columns"));
        }

        let labels = rate_cols.iter().map(|&c| raw.headers[c].clone()).collect();

        let mut rates = HashMap::with_capacity(raw.len());
        for row in 0..raw.len() {
            let band = raw.text(row, key_col)?.to_string();
            let values = rate_cols
                .iter()
                .map(|&c| raw.number(row, c))
                .collect::<Result<Vec<f64>>>()?;

            if rates.insert(band.clone(), values).is_some() {
                return Err(ModelError::schema(
                    &raw.name,
                    format!("duplicate age band '{}'", band),
                ));
            }
        }

        Ok(Self { labels, rates })
    }

    /// Number of forecast years
    pub fn horizon(&self) -> usize {
        self.labels.len()
    }

    /// Rate column headers in horizon order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Rates for an age band, `None` if the band is not in the table
    pub fn rates_for(&self, age_band: &str) -> Option<&[f64]> {
        self.rates.get(age_band).map(|r| r.as_slice())
    }

    pub fn age_bands(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(|k| k.as_str())
    }

    /// Forecast years implied by column position after `base_year`
    ///
    /// Headers that parse as a year but disagree with their position are
    /// reported and otherwise ignored.
    pub fn forecast_years(&self, base_year: i32) -> Vec<i32> {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let year = base_year + i as i32 + 1;
                if let Ok(named) = label.parse::<i32>() {
                    if named != year {
                        log::warn!(
                            "Growth column '{}' is in position for year {}; position wins",
                            label,
                            year
                        );
                    }
                }
                year
            })
            .collect()
    }
}
