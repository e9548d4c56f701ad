//! Forecast output structures

use crate::activity::{ActivityRecord, Domain};
use std::collections::BTreeMap;

/// Long-format forecast: one row per segment per year
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastTable {
    pub domain: Domain,

    /// Base year followed by the forecast years, ascending
    pub years: Vec<i32>,

    /// Rows grouped by year, segments in historic order within each year
    pub records: Vec<ActivityRecord>,
}

impl ForecastTable {
    pub fn new(domain: Domain, years: Vec<i32>, records: Vec<ActivityRecord>) -> Self {
        Self {
            domain,
            years,
            records,
        }
    }

    /// Rows for a single year
    pub fn year(&self, year: i32) -> impl Iterator<Item = &ActivityRecord> {
        self.records.iter().filter(move |r| r.year == year)
    }

    /// Total activity per year
    pub fn total_by_year(&self) -> BTreeMap<i32, f64> {
        let mut totals: BTreeMap<i32, f64> = self.years.iter().map(|&y| (y, 0.0)).collect();
        for record in &self.records {
            *totals.entry(record.year).or_insert(0.0) += record.activity;
        }
        totals
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
