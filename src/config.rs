//! Run configuration
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! describes the standard model run.

use crate::error::{ModelError, Result};
use crate::projection::DEFAULT_BASE_YEAR;
use crate::reallocation::DEFAULT_EFFECTIVE_YEAR;
use crate::source::{FillPolicy, SourceTable, DEFAULT_DATA_DIR};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default location of the result file
pub const DEFAULT_OUTPUT_PATH: &str = "results.csv";

/// One input file and how its empty cells are filled
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceSpec {
    pub file: String,
    pub fill: FillPolicy,
}

impl SourceSpec {
    pub fn default_for(table: SourceTable) -> Self {
        Self {
            file: table.default_file_name().to_string(),
            fill: table.default_fill(),
        }
    }
}

/// The four input files
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceFiles {
    pub assumptions: SourceSpec,
    pub population_growth: SourceSpec,
    pub acute_activity: SourceSpec,
    pub community_activity: SourceSpec,
}

impl SourceFiles {
    pub fn get(&self, table: SourceTable) -> &SourceSpec {
        match table {
            SourceTable::Assumptions => &self.assumptions,
            SourceTable::PopulationGrowth => &self.population_growth,
            SourceTable::AcuteActivity => &self.acute_activity,
            SourceTable::CommunityActivity => &self.community_activity,
        }
    }
}

impl Default for SourceFiles {
    fn default() -> Self {
        Self {
            assumptions: SourceSpec::default_for(SourceTable::Assumptions),
            population_growth: SourceSpec::default_for(SourceTable::PopulationGrowth),
            acute_activity: SourceSpec::default_for(SourceTable::AcuteActivity),
            community_activity: SourceSpec::default_for(SourceTable::CommunityActivity),
        }
    }
}

/// Configuration for a model run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory holding the input files
    pub data_dir: PathBuf,

    /// Where the combined table is written
    pub output_path: PathBuf,

    /// Year of the historic activity
    pub base_year: i32,

    /// First year the community shift applies to
    pub effective_year: i32,

    /// Run independent graph nodes on the rayon pool
    pub parallel: bool,

    pub sources: SourceFiles,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            base_year: DEFAULT_BASE_YEAR,
            effective_year: DEFAULT_EFFECTIVE_YEAR,
            parallel: true,
            sources: SourceFiles::default(),
        }
    }
}

impl ModelConfig {
    /// Load configuration from a JSON file; omitted fields keep their defaults
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ModelError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&text).map_err(|e| match e {
            ModelError::Config { message, .. } => ModelError::Config {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ModelError::Config {
            path: PathBuf::from("<json>"),
            message: e.to_string(),
        })
    }

    /// Full path of an input file
    pub fn source_path(&self, table: SourceTable) -> PathBuf {
        self.data_dir.join(&self.sources.get(table).file)
    }

    pub fn source_fill(&self, table: SourceTable) -> FillPolicy {
        self.sources.get(table).fill
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_standard_run() {
        let config = ModelConfig::default();
        assert_eq!(config.base_year, 2020);
        assert_eq!(config.effective_year, 2025);
        assert!(config.parallel);
        assert_eq!(
            config.source_path(SourceTable::PopulationGrowth),
            Path::new("Import_data").join("population_growth.csv")
        );
        assert_eq!(config.source_fill(SourceTable::Assumptions), FillPolicy::NoFill);
        assert_eq!(config.source_fill(SourceTable::AcuteActivity), FillPolicy::FillZero);
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(ModelConfig::from_json_str("{}").unwrap(), ModelConfig::default());
    }

    #[test]
    fn test_partial_json_overrides() {
        let config = ModelConfig::from_json_str(
            r#"{
                "effective_year": 2027,
                "data_dir": "fixtures",
                "sources": { "community_activity": { "file": "community.csv", "fill": "fill-blank" } }
            }"#,
        )
        .unwrap();

        assert_eq!(config.effective_year, 2027);
        assert_eq!(config.base_year, 2020);
        assert_eq!(
            config.source_path(SourceTable::CommunityActivity),
            Path::new("fixtures").join("community.csv")
        );
        assert_eq!(config.source_fill(SourceTable::CommunityActivity), FillPolicy::FillBlank);
        assert_eq!(config.sources.assumptions, SourceSpec::default_for(SourceTable::Assumptions));
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = ModelConfig::from_json_str(r#"{ "effective_year": "soon" }"#).unwrap_err();
        assert!(matches!(err, ModelError::Config { .. }));
    }

    #[test]
    fn test_unknown_fill_policy_is_config_error() {
        let err = ModelConfig::from_json_str(
            r#"{ "sources": { "assumptions": { "file": "a.csv", "fill": "fill-nan" } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::Config { .. }));
    }

    #[test]
    fn test_missing_config_file() {
        let err = ModelConfig::from_json_path("no/such/model.json").unwrap_err();
        assert!(err.to_string().contains("model.json"));
    }
}
