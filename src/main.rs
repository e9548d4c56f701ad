//! Healthcare Model CLI
//!
//! Runs the forecast and reallocation pipeline over the input directory and
//! writes the combined table to CSV.

use anyhow::{Context, Result};
use clap::Parser;
use healthcare_model::config::ModelConfig;
use healthcare_model::pipeline;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "healthcare_model", version, about)]
struct Cli {
    /// JSON configuration file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the input CSV files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Output CSV path
    #[arg(long)]
    output: Option<PathBuf>,

    /// First year the community shift applies
    #[arg(long)]
    effective_year: Option<i32>,

    /// Year of the historic activity
    #[arg(long)]
    base_year: Option<i32>,

    /// Run graph nodes one at a time
    #[arg(long)]
    sequential: bool,
}

impl Cli {
    fn into_config(self) -> Result<ModelConfig> {
        let mut config = match &self.config {
            Some(path) => ModelConfig::from_json_path(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?,
            None => ModelConfig::default(),
        };

        if let Some(dir) = self.data_dir {
            config.data_dir = dir;
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if let Some(year) = self.effective_year {
            config.effective_year = year;
        }
        if let Some(year) = self.base_year {
            config.base_year = year;
        }
        if self.sequential {
            config.parallel = false;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Cli::parse().into_config()?;
    log::debug!("Configuration: {:?}", config);

    let start = Instant::now();
    let table = pipeline::run_to_file(&config).with_context(|| {
        format!(
            "running model over {} (output {})",
            config.data_dir.display(),
            config.output_path.display()
        )
    })?;

    let summary = table.summary();
    println!("\nSummary:");
    println!("  Rows: {}", summary.total_rows);
    if let (Some(first), Some(last)) = (summary.first_year, summary.last_year) {
        println!("  Years: {}-{}", first, last);
    }
    println!("  Effective Year: {}", table.effective_year);
    println!("  Acute Activity: {:.2} -> {:.2}", summary.total_acute, summary.total_revised_acute);
    println!(
        "  Community Activity: {:.2} -> {:.2}",
        summary.total_community, summary.total_revised_community
    );
    println!("  Shifted to Community: {:.2}", summary.total_shift);
    println!("\nResults written to: {}", config.output_path.display());

    log::info!("Completed in {:?}", start.elapsed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "healthcare_model",
            "--data-dir",
            "inputs",
            "--effective-year",
            "2027",
            "--sequential",
        ]);
        let config = cli.into_config().unwrap();
        assert_eq!(config.data_dir, PathBuf::from("inputs"));
        assert_eq!(config.effective_year, 2027);
        assert!(!config.parallel);
        assert_eq!(config.base_year, ModelConfig::default().base_year);
    }

    #[test]
    fn test_missing_config_file_is_reported() {
        let cli = Cli::parse_from(["healthcare_model", "--config", "no/such/config.json"]);
        let err = cli.into_config().unwrap_err();
        assert!(format!("{:#}", err).contains("no/such/config.json"));
    }
}
