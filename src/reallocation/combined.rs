//! Combined acute and community output structures

use crate::activity::DimensionKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single row of reallocation output for one segment and year
///
/// Field order is the output column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedActivityRecord {
    // Segment
    pub hospital_name: String,
    pub region: String,
    pub service_line: String,
    pub sex: String,
    pub age_band: String,
    pub year: i32,

    // Forecast before reallocation
    pub acute_activity: f64,
    pub community_activity: f64,

    // After reallocation
    pub revised_acute_activity: f64,
    pub revised_community_activity: f64,
}

impl CombinedActivityRecord {
    pub fn key(&self) -> DimensionKey {
        DimensionKey::new(
            self.hospital_name.as_str(),
            self.region.as_str(),
            self.service_line.as_str(),
            self.sex.as_str(),
            self.age_band.as_str(),
        )
    }

    /// Activity moved from acute to community
    pub fn shift(&self) -> f64 {
        self.acute_activity - self.revised_acute_activity
    }

    pub fn total_activity(&self) -> f64 {
        self.acute_activity + self.community_activity
    }

    pub fn revised_total_activity(&self) -> f64 {
        self.revised_acute_activity + self.revised_community_activity
    }
}

/// Complete reallocation result
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedTable {
    /// First year the shift applies to
    pub effective_year: i32,
    pub records: Vec<CombinedActivityRecord>,
}

impl CombinedTable {
    pub fn new(effective_year: i32, records: Vec<CombinedActivityRecord>) -> Self {
        Self {
            effective_year,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get summary statistics
    pub fn summary(&self) -> ReallocationSummary {
        let years: BTreeSet<i32> = self.records.iter().map(|r| r.year).collect();
        ReallocationSummary {
            total_rows: self.records.len(),
            first_year: years.first().copied(),
            last_year: years.last().copied(),
            total_acute: self.records.iter().map(|r| r.acute_activity).sum(),
            total_community: self.records.iter().map(|r| r.community_activity).sum(),
            total_revised_acute: self.records.iter().map(|r| r.revised_acute_activity).sum(),
            total_revised_community: self
                .records
                .iter()
                .map(|r| r.revised_community_activity)
                .sum(),
            total_shift: self.records.iter().map(|r| r.shift()).sum(),
        }
    }
}

/// Summary statistics from a reallocation run
#[derive(Debug, Clone, PartialEq)]
pub struct ReallocationSummary {
    pub total_rows: usize,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    pub total_acute: f64,
    pub total_community: f64,
    pub total_revised_acute: f64,
    pub total_revised_community: f64,
    pub total_shift: f64,
}
