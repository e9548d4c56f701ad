//! Activity data structures matching the hospital and community activity format

use serde::Deserialize;
use std::fmt;

/// Delivery setting of an activity table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Acute hospital activity
    Acute,
    /// Community services activity
    Community,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Acute => "acute",
            Domain::Community => "community",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Population segment identity, carried unchanged through every transform
///
/// `provider` holds the hospital name for acute activity and the provider
/// name for community activity; the two are compared as the same field when
/// the settings are joined.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DimensionKey {
    pub provider: String,
    pub region: String,
    pub service_line: String,
    pub sex: String,
    pub age_band: String,
}

impl DimensionKey {
    pub fn new(
        provider: impl Into<String>,
        region: impl Into<String>,
        service_line: impl Into<String>,
        sex: impl Into<String>,
        age_band: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            region: region.into(),
            service_line: service_line.into(),
            sex: sex.into(),
            age_band: age_band.into(),
        }
    }
}

/// One row of activity: a segment in one year
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRecord {
    pub domain: Domain,
    pub key: DimensionKey,
    pub year: i32,
    /// Non-negative count of activity
    pub activity: f64,
}

impl ActivityRecord {
    pub fn new(domain: Domain, key: DimensionKey, year: i32, activity: f64) -> Self {
        Self {
            domain,
            key,
            year,
            activity,
        }
    }
}
