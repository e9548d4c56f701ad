//! Core projection engine for annual activity forecasts
//!
//! Each segment's base-year activity is rolled forward one year at a time:
//! a year's growth rate applies to the previous year's projected value.

use crate::activity::{ActivityRecord, ActivityTable};
use crate::assumptions::GrowthTable;
use crate::error::{ModelError, Result};
use super::forecast::ForecastTable;
use std::collections::BTreeSet;

/// Year of the historic activity the forecast starts from
pub const DEFAULT_BASE_YEAR: i32 = 2020;

/// Configuration for a forecast run
#[derive(Debug, Clone)]
pub struct ForecastConfig {
    /// Year every historic row must carry
    pub base_year: i32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            base_year: DEFAULT_BASE_YEAR,
        }
    }
}

/// Projects historic activity forward using demographic growth
#[derive(Debug, Clone, Default)]
pub struct ForecastEngine {
    config: ForecastConfig,
}

impl ForecastEngine {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Project every historic row across the growth table's horizon
    ///
    /// Age bands with no growth row are projected at zero growth. The output
    /// has `historic.len() * (1 + growth.horizon())` rows.
    pub fn project(&self, historic: &ActivityTable, growth: &GrowthTable) -> Result<ForecastTable> {
        let base_year = self.config.base_year;
        self.check_base_year(historic)?;

        let forecast_years = growth.forecast_years(base_year);
        let zero_growth = vec![0.0; growth.horizon()];

        let mut unmatched: BTreeSet<&str> = BTreeSet::new();
        let paths: Vec<Vec<f64>> = historic
            .records
            .iter()
            .map(|record| {
                let rates = growth.rates_for(&record.key.age_band).unwrap_or_else(|| {
                    unmatched.insert(record.key.age_band.as_str());
                    zero_growth.as_slice()
                });
                compound(record.activity, rates)
            })
            .collect();

        if !unmatched.is_empty() {
            log::warn!(
                "{} forecast: {} age band(s) missing from growth table, projected at zero growth: {:?}",
                historic.domain,
                unmatched.len(),
                unmatched
            );
        }

        let mut years = Vec::with_capacity(forecast_years.len() + 1);
        years.push(base_year);
        years.extend(forecast_years);

        // Unpivot: year-major, segments in historic order within each year
        let mut records = Vec::with_capacity(historic.len() * years.len());
        for (i, &year) in years.iter().enumerate() {
            for (record, path) in historic.records.iter().zip(&paths) {
                records.push(ActivityRecord::new(
                    record.domain,
                    record.key.clone(),
                    year,
                    path[i],
                ));
            }
        }

        log::debug!(
            "{} forecast: {} historic rows x {} years = {} rows",
            historic.domain,
            historic.len(),
            years.len(),
            records.len()
        );

        let table = ForecastTable::new(historic.domain, years, records);
        if log::log_enabled!(log::Level::Debug) {
            log::debug!(
                "{} forecast totals by year: {:?}",
                historic.domain,
                table.total_by_year()
            );
        }
        Ok(table)
    }

    fn check_base_year(&self, historic: &ActivityTable) -> Result<()> {
        let years = historic.years();
        if years.len() > 1 {
            return Err(ModelError::schema(
                format!("{} activity", historic.domain),
                format!("historic activity spans several years: {:?}", years),
            ));
        }
        match years.first() {
            Some(&year) if year != self.config.base_year => Err(ModelError::schema(
                format!("{} activity", historic.domain),
                format!(
                    "historic year {} does not match base year {}",
                    year, self.config.base_year
                ),
            )),
            _ => Ok(()),
        }
    }
}

/// Base value followed by one compounded value per rate
///
/// `value[0] = base`, `value[i] = value[i - 1] * (1 + rates[i - 1])`.
pub fn compound(base: f64, rates: &[f64]) -> Vec<f64> {
    let mut path = Vec::with_capacity(rates.len() + 1);
    path.push(base);
    let mut value = base;
    for rate in rates {
        value *= 1.0 + rate;
        path.push(value);
    }
    path
}

/// Project with the default base year
pub fn project(historic: &ActivityTable, growth: &GrowthTable) -> Result<ForecastTable> {
    ForecastEngine::default().project(historic, growth)
}
