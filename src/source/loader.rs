//! Load model input tables from CSV files
//!
//! Every input goes through one function, [`load_table`], parameterised by a
//! [`FillPolicy`]. Typed conversion and schema checks happen afterwards in
//! the `from_raw` constructors of each table.

use crate::error::{ModelError, Result};
use csv::StringRecord;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Default directory holding the input CSV files
pub const DEFAULT_DATA_DIR: &str = "Import_data";

/// How empty CSV cells are treated at load time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillPolicy {
    /// Leave empty cells missing
    NoFill,
    /// Replace empty cells with `0`
    FillZero,
    /// Replace empty cells with an empty string
    FillBlank,
}

impl FillPolicy {
    fn apply(self, cell: &str) -> Option<String> {
        if !cell.is_empty() {
            return Some(cell.to_string());
        }
        match self {
            FillPolicy::NoFill => None,
            FillPolicy::FillZero => Some("0".to_string()),
            FillPolicy::FillBlank => Some(String::new()),
        }
    }
}

/// The four tables the model consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceTable {
    Assumptions,
    PopulationGrowth,
    AcuteActivity,
    CommunityActivity,
}

impl SourceTable {
    pub fn default_file_name(self) -> &'static str {
        match self {
            SourceTable::Assumptions => "assumptions.csv",
            SourceTable::PopulationGrowth => "population_growth.csv",
            SourceTable::AcuteActivity => "acute_hospital_activity.csv",
            SourceTable::CommunityActivity => "community_activity.csv",
        }
    }

    pub fn default_fill(self) -> FillPolicy {
        match self {
            SourceTable::Assumptions => FillPolicy::NoFill,
            _ => FillPolicy::FillZero,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SourceTable::Assumptions => "Assumptions",
            SourceTable::PopulationGrowth => "Population_growth_data",
            SourceTable::AcuteActivity => "Acute_hospital_data",
            SourceTable::CommunityActivity => "Community_data",
        }
    }
}

/// An untyped table: a header row plus cells, `None` where a cell is missing
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Name used in error messages (usually the file name)
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Position of a column, or a schema error naming it
    pub fn column(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ModelError::schema(&self.name, format!("missing column '{}'", name)))
    }

    /// Position of the first column matching any of the candidate names
    pub fn column_any(&self, names: &[&str]) -> Result<usize> {
        names
            .iter()
            .find_map(|n| self.headers.iter().position(|h| h == n))
            .ok_or_else(|| {
                ModelError::schema(
                    &self.name,
                    format!("missing column, expected one of {:?}", names),
                )
            })
    }

    /// Cell as text, failing if the cell is missing
    pub fn text(&self, row: usize, col: usize) -> Result<&str> {
        self.rows[row][col].as_deref().ok_or_else(|| {
            ModelError::schema(
                &self.name,
                format!("missing value in column '{}' at row {}", self.headers[col], row + 1),
            )
        })
    }

    /// Cell parsed as a finite number, failing if missing or non-numeric
    pub fn number(&self, row: usize, col: usize) -> Result<f64> {
        let text = self.text(row, col)?;
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(ModelError::schema(
                &self.name,
                format!(
                    "non-numeric value '{}' in column '{}' at row {}",
                    text,
                    self.headers[col],
                    row + 1
                ),
            )),
        }
    }

    /// Fail unless every named column is present
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        names.iter().try_for_each(|name| self.column(name).map(|_| ()))
    }

    /// Deserialize every row into a fixed-schema row type
    ///
    /// Missing cells reach serde as empty fields, so they read as `None` for
    /// optional fields and fail for required numeric ones.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let headers = StringRecord::from(self.headers.clone());
        self.rows
            .iter()
            .enumerate()
            .map(|(i, cells)| {
                let record: StringRecord =
                    cells.iter().map(|c| c.as_deref().unwrap_or("")).collect();
                record.deserialize(Some(&headers)).map_err(|e| {
                    ModelError::schema(&self.name, format!("invalid row {}: {}", i + 1, e))
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Load a CSV file into a [`RawTable`], applying the fill policy to empty cells
pub fn load_table<P: AsRef<Path>>(path: P, fill: FillPolicy) -> Result<RawTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ModelError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    read_table(file, name, fill).map_err(|source| ModelError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a CSV table from any reader (e.g., string buffer, network stream)
pub fn load_table_from_reader<R: std::io::Read>(
    reader: R,
    name: &str,
    fill: FillPolicy,
) -> Result<RawTable> {
    read_table(reader, name.to_string(), fill).map_err(|source| ModelError::Csv {
        path: PathBuf::from(name),
        source,
    })
}

fn read_table<R: std::io::Read>(
    reader: R,
    name: String,
    fill: FillPolicy,
) -> csv::Result<RawTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        rows.push(record.iter().map(|cell| fill.apply(cell)).collect());
    }

    log::debug!("Loaded {} rows from {}", rows.len(), name);

    Ok(RawTable {
        name,
        headers,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAPPY: &str = "age_band,2021,2022\nA.000-004,0.1,\nB.005-009,,0.2\n";

    #[test]
    fn test_no_fill_keeps_missing_cells() {
        let table = load_table_from_reader(GAPPY.as_bytes(), "growth", FillPolicy::NoFill).unwrap();
        assert_eq!(table.headers, vec!["age_band", "2021", "2022"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0][2], None);
        assert!(table.number(0, 2).unwrap_err().is_schema());
        assert_eq!(table.rows[1][1], None);
    }

    #[test]
    fn test_fill_zero_replaces_missing_cells() {
        let table =
            load_table_from_reader(GAPPY.as_bytes(), "growth", FillPolicy::FillZero).unwrap();
        assert_eq!(table.number(0, 2).unwrap(), 0.0);
        assert_eq!(table.number(1, 1).unwrap(), 0.0);
        assert_eq!(table.number(1, 2).unwrap(), 0.2);
    }

    #[test]
    fn test_fill_blank_gives_empty_text() {
        let table =
            load_table_from_reader(GAPPY.as_bytes(), "growth", FillPolicy::FillBlank).unwrap();
        assert_eq!(table.text(0, 2).unwrap(), "");
        // Blank is present but not numeric
        assert!(table.number(0, 2).unwrap_err().is_schema());
    }

    #[test]
    fn test_column_lookup() {
        let table = load_table_from_reader(GAPPY.as_bytes(), "growth", FillPolicy::NoFill).unwrap();
        assert_eq!(table.column("2022").unwrap(), 2);
        assert_eq!(table.column_any(&["band", "age_band"]).unwrap(), 0);
        assert!(table.column("activity").unwrap_err().is_schema());
    }

    #[test]
    fn test_number_rejects_non_finite_values() {
        let data = "age_band,2021,2022,2023\nA.000-004,inf,NaN,-infinity\n";
        let table = load_table_from_reader(data.as_bytes(), "growth", FillPolicy::NoFill).unwrap();
        for col in 1..=3 {
            let err = table.number(0, col).unwrap_err();
            assert!(err.is_schema());
            assert!(err.to_string().contains("non-numeric"));
        }
    }

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct ShiftRow {
        service_line: String,
        ratio: Option<f64>,
    }

    #[test]
    fn test_deserialize_rows_by_header() {
        let data = "ratio,service_line\n0.2,Cardiology\n,Urology\n";
        let table = load_table_from_reader(data.as_bytes(), "shift", FillPolicy::NoFill).unwrap();
        let rows: Vec<ShiftRow> = table.deserialize().unwrap();
        assert_eq!(
            rows,
            vec![
                ShiftRow { service_line: "Cardiology".to_string(), ratio: Some(0.2) },
                ShiftRow { service_line: "Urology".to_string(), ratio: None },
            ]
        );

        table.require_columns(&["ratio", "service_line"]).unwrap();
        assert!(table.require_columns(&["ratio", "region"]).unwrap_err().is_schema());
    }

    #[test]
    fn test_deserialize_bad_row_is_schema_error() {
        let data = "ratio,service_line\nhalf,Cardiology\n";
        let table = load_table_from_reader(data.as_bytes(), "shift", FillPolicy::NoFill).unwrap();
        let err = table.deserialize::<ShiftRow>().unwrap_err();
        assert!(err.is_schema());
        assert!(err.to_string().contains("invalid row 1"));
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let err = load_table("no/such/dir/assumptions.csv", FillPolicy::NoFill).unwrap_err();
        assert!(matches!(err, ModelError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_source_defaults() {
        assert_eq!(SourceTable::Assumptions.default_fill(), FillPolicy::NoFill);
        assert_eq!(SourceTable::AcuteActivity.default_fill(), FillPolicy::FillZero);
        assert_eq!(
            SourceTable::CommunityActivity.default_file_name(),
            "community_activity.csv"
        );
    }

    #[test]
    fn test_fill_policy_serde_names() {
        let policy: FillPolicy = serde_json::from_str("\"fill-zero\"").unwrap();
        assert_eq!(policy, FillPolicy::FillZero);
        assert_eq!(serde_json::to_string(&FillPolicy::NoFill).unwrap(), "\"no-fill\"");
    }
}
