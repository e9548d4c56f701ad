//! The healthcare model as a task graph
//!
//! Four source loads feed two independent forecasts, which feed the
//! reallocation. Node names follow the model's dataset names.

use super::graph::{NodeId, TaskGraph};
use super::scheduler::Scheduler;
use super::value::Value;
use crate::config::ModelConfig;
use crate::error::Result;
use crate::output::write_combined_csv;
use crate::projection::ForecastConfig;
use crate::reallocation::{CombinedTable, ReallocationConfig};
use crate::source::SourceTable;
use std::sync::Arc;

/// Declared model graph with handles to each stage
#[derive(Debug, Clone)]
pub struct ModelGraph {
    pub graph: TaskGraph,
    pub assumptions: NodeId,
    pub population_growth: NodeId,
    pub acute_activity: NodeId,
    pub community_activity: NodeId,
    pub acute_forecast: NodeId,
    pub community_forecast: NodeId,
    pub business_transform: NodeId,
}

/// Declare the full model; performs no I/O
pub fn build_graph(config: &ModelConfig) -> Result<ModelGraph> {
    let mut graph = TaskGraph::new();

    let mut load = |table: SourceTable| {
        graph.add_load(
            table.label(),
            table,
            config.source_path(table),
            config.source_fill(table),
        )
    };
    let assumptions = load(SourceTable::Assumptions);
    let population_growth = load(SourceTable::PopulationGrowth);
    let acute_activity = load(SourceTable::AcuteActivity);
    let community_activity = load(SourceTable::CommunityActivity);

    let forecast_config = ForecastConfig {
        base_year: config.base_year,
    };
    let acute_forecast = graph.add_forecast(
        "fa_acute_forecast",
        acute_activity,
        population_growth,
        forecast_config.clone(),
    )?;
    let community_forecast = graph.add_forecast(
        "fa_community_forecast",
        community_activity,
        population_growth,
        forecast_config,
    )?;

    let business_transform = graph.add_reallocation(
        "business_transform",
        acute_forecast,
        community_forecast,
        assumptions,
        ReallocationConfig {
            effective_year: config.effective_year,
        },
    )?;

    Ok(ModelGraph {
        graph,
        assumptions,
        population_growth,
        acute_activity,
        community_activity,
        acute_forecast,
        community_forecast,
        business_transform,
    })
}

/// Build and run the model, returning the combined table
pub fn run(config: &ModelConfig) -> Result<CombinedTable> {
    let model = build_graph(config)?;
    let scheduler = Scheduler::new(config.parallel);

    log::info!(
        "Running model: {} nodes, data from {}",
        model.graph.len(),
        config.data_dir.display()
    );
    let value = scheduler.materialize(&model.graph, model.business_transform)?;

    // The report is dropped by now, so this is usually the only reference
    match Arc::try_unwrap(value) {
        Ok(Value::Combined(table)) => Ok(table),
        Ok(other) => other.as_combined().cloned(),
        Err(shared) => shared.as_combined().cloned(),
    }
}

/// Run the model and write the result to `config.output_path`
///
/// Nothing is written if any stage fails.
pub fn run_to_file(config: &ModelConfig) -> Result<CombinedTable> {
    let table = run(config)?;
    write_combined_csv(&config.output_path, &table)?;
    Ok(table)
}
