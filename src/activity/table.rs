//! Historic activity table and its schema checks

use super::{ActivityRecord, DimensionKey, Domain};
use crate::error::{ModelError, Result};
use crate::source::RawTable;
use serde::Deserialize;
use std::collections::BTreeSet;

/// Accepted names for the setting-specific identifier column
pub const PROVIDER_COLUMNS: [&str; 3] = ["hospital_name", "provider_name", "provider"];

/// Columns every activity file carries besides the provider column
const REQUIRED_COLUMNS: [&str; 7] = [
    "domain",
    "year",
    "region",
    "service_line",
    "sex",
    "age_band",
    "activity",
];

/// Raw CSV row of an activity file
#[derive(Debug, Deserialize)]
struct ActivityRow {
    domain: Domain,
    // Years written by spreadsheet tooling may carry a trailing ".0"
    year: f64,
    #[serde(rename = "hospital_name", alias = "provider_name", alias = "provider")]
    provider: String,
    region: String,
    service_line: String,
    sex: String,
    age_band: String,
    activity: Option<f64>,
}

impl ActivityRow {
    fn into_record(self, table: &str, row: usize, expected: Domain) -> Result<ActivityRecord> {
        let fail = |message: String| ModelError::schema(table, format!("{} at row {}", message, row));

        if self.domain != expected {
            return Err(fail(format!(
                "domain '{}' does not match expected '{}'",
                self.domain, expected
            )));
        }

        let activity = self
            .activity
            .ok_or_else(|| fail("missing value in column 'activity'".to_string()))?;
        if !activity.is_finite() {
            return Err(fail(format!("non-finite activity {}", activity)));
        }
        if activity < 0.0 {
            return Err(fail(format!("negative activity {}", activity)));
        }

        let year_range = f64::from(i32::MIN)..=f64::from(i32::MAX);
        if self.year.fract() != 0.0 || !year_range.contains(&self.year) {
            return Err(fail(format!("non-integer year {}", self.year)));
        }

        let key = DimensionKey::new(
            self.provider,
            self.region,
            self.service_line,
            self.sex,
            self.age_band,
        );
        for (column, value) in [
            ("provider", &key.provider),
            ("region", &key.region),
            ("service_line", &key.service_line),
            ("sex", &key.sex),
            ("age_band", &key.age_band),
        ] {
            if value.is_empty() {
                return Err(fail(format!("missing value in column '{}'", column)));
            }
        }

        Ok(ActivityRecord::new(expected, key, self.year as i32, activity))
    }
}

/// Base-year activity for one delivery setting
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityTable {
    pub domain: Domain,
    pub records: Vec<ActivityRecord>,
}

impl ActivityTable {
    pub fn new(domain: Domain, records: Vec<ActivityRecord>) -> Self {
        Self { domain, records }
    }

    /// Convert a loaded CSV table, checking every required column
    ///
    /// Every row must carry `expected` in its `domain` column and a
    /// finite, non-negative `activity`.
    pub fn from_raw(raw: &RawTable, expected: Domain) -> Result<Self> {
        raw.require_columns(&REQUIRED_COLUMNS)?;
        raw.column_any(&PROVIDER_COLUMNS)?;

        let records = raw
            .deserialize::<ActivityRow>()?
            .into_iter()
            .enumerate()
            .map(|(i, row)| row.into_record(&raw.name, i + 1, expected))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(expected, records))
    }

    /// Distinct years present in the table
    pub fn years(&self) -> BTreeSet<i32> {
        self.records.iter().map(|r| r.year).collect()
    }

    pub fn total_activity(&self) -> f64 {
        self.records.iter().map(|r| r.activity).sum()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{load_table_from_reader, FillPolicy};

    const ACUTE: &str = "\
domain,year,hospital_name,region,service_line,sex,age_band,activity
acute,2020,Hospital one,East,Cardiology,Female,A.000-004,120
acute,2020,Hospital two,West,Urology,Male,R.085+,
";

    fn raw(data: &str, fill: FillPolicy) -> RawTable {
        load_table_from_reader(data.as_bytes(), "acute_hospital_activity.csv", fill).unwrap()
    }

    #[test]
    fn test_from_raw_reads_rows() {
        let table = ActivityTable::from_raw(&raw(ACUTE, FillPolicy::FillZero), Domain::Acute).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].key.provider, "Hospital one");
        assert_eq!(table.records[0].activity, 120.0);
        // Filled with zero at load time
        assert_eq!(table.records[1].activity, 0.0);
        assert_eq!(table.years().into_iter().collect::<Vec<_>>(), vec![2020]);
        assert_eq!(table.total_activity(), 120.0);
    }

    #[test]
    fn test_missing_activity_without_fill_is_schema_error() {
        let err = ActivityTable::from_raw(&raw(ACUTE, FillPolicy::NoFill), Domain::Acute).unwrap_err();
        assert!(err.is_schema());
    }

    #[test]
    fn test_non_numeric_activity_is_schema_error() {
        let data = "\
domain,year,hospital_name,region,service_line,sex,age_band,activity
acute,2020,Hospital one,East,Cardiology,Female,A.000-004,lots
";
        let err = ActivityTable::from_raw(&raw(data, FillPolicy::FillZero), Domain::Acute).unwrap_err();
        assert!(err.to_string().contains("invalid row 1"));
    }

    #[test]
    fn test_non_finite_activity_is_schema_error() {
        for value in ["inf", "NaN", "-infinity"] {
            let data = format!(
                "domain,year,hospital_name,region,service_line,sex,age_band,activity\n\
                 acute,2020,Hospital one,East,Cardiology,Female,A.000-004,{}\n",
                value
            );
            let err = ActivityTable::from_raw(&raw(&data, FillPolicy::FillZero), Domain::Acute)
                .unwrap_err();
            assert!(err.is_schema(), "{}", err);
        }
    }

    #[test]
    fn test_non_finite_activity_rejected_after_parsing() {
        for activity in [f64::INFINITY, f64::NAN] {
            let row = ActivityRow {
                domain: Domain::Acute,
                year: 2020.0,
                provider: "Hospital one".to_string(),
                region: "East".to_string(),
                service_line: "Cardiology".to_string(),
                sex: "Female".to_string(),
                age_band: "A.000-004".to_string(),
                activity: Some(activity),
            };
            let err = row.into_record("acute", 1, Domain::Acute).unwrap_err();
            assert!(err.to_string().contains("non-finite activity"));
        }
    }

    #[test]
    fn test_negative_activity_is_schema_error() {
        let data = "\
domain,year,hospital_name,region,service_line,sex,age_band,activity
acute,2020,Hospital one,East,Cardiology,Female,A.000-004,-3
";
        let err = ActivityTable::from_raw(&raw(data, FillPolicy::FillZero), Domain::Acute).unwrap_err();
        assert!(err.to_string().contains("negative activity -3"));
    }

    #[test]
    fn test_year_accepts_float_formatting() {
        let data = "\
domain,year,hospital_name,region,service_line,sex,age_band,activity
acute,2020.0,Hospital one,East,Cardiology,Female,A.000-004,3
acute,2020,Hospital one,East,Cardiology,Female,B.005-009,4
";
        let table = ActivityTable::from_raw(&raw(data, FillPolicy::FillZero), Domain::Acute).unwrap();
        assert!(table.records.iter().all(|r| r.year == 2020));

        let fractional = data.replace("2020.0", "2020.5");
        let err = ActivityTable::from_raw(&raw(&fractional, FillPolicy::FillZero), Domain::Acute)
            .unwrap_err();
        assert!(err.to_string().contains("non-integer year"));
    }

    #[test]
    fn test_missing_key_value_without_fill_is_schema_error() {
        let data = "\
domain,year,hospital_name,region,service_line,sex,age_band,activity
acute,2020,Hospital one,,Cardiology,Female,A.000-004,3
";
        let err = ActivityTable::from_raw(&raw(data, FillPolicy::NoFill), Domain::Acute).unwrap_err();
        assert!(err.to_string().contains("column 'region'"));
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let data = "domain,year,hospital_name,region,service_line,sex,activity\n";
        let err = ActivityTable::from_raw(&raw(data, FillPolicy::FillZero), Domain::Acute).unwrap_err();
        assert!(err.to_string().contains("age_band"));
    }

    #[test]
    fn test_provider_column_alias() {
        let data = "\
domain,year,provider_name,region,service_line,sex,age_band,activity
community,2020,Provider one,North,Diabetes,Male,C.010-014,7
";
        let table =
            ActivityTable::from_raw(&raw(data, FillPolicy::FillZero), Domain::Community).unwrap();
        assert_eq!(table.records[0].key.provider, "Provider one");
        assert_eq!(table.domain, Domain::Community);
    }

    #[test]
    fn test_wrong_domain_is_schema_error() {
        let err =
            ActivityTable::from_raw(&raw(ACUTE, FillPolicy::FillZero), Domain::Community).unwrap_err();
        assert!(err.is_schema());

        // Domain values are case sensitive
        let capitalised = ACUTE.replace("acute,", "Acute,");
        let err = ActivityTable::from_raw(&raw(&capitalised, FillPolicy::FillZero), Domain::Acute)
            .unwrap_err();
        assert!(err.is_schema());
    }
}
