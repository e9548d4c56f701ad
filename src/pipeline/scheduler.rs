//! Executes a task graph wave by wave
//!
//! Only the ancestor closure of the requested node is run. Nodes in the same
//! wave have no dependency on each other and run on the rayon pool. A failed
//! node skips its dependents; unrelated branches still run.

use super::graph::{NodeId, Task, TaskGraph};
use super::value::Value;
use crate::activity::{ActivityTable, Domain};
use crate::assumptions::{AssumptionTable, GrowthTable};
use crate::error::{ModelError, Result};
use crate::projection::ForecastEngine;
use crate::reallocation::ReallocationEngine;
use crate::source::{load_table, SourceTable};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

/// Final state of a node after a run
#[derive(Debug)]
pub enum NodeStatus {
    Succeeded(Arc<Value>),
    Failed(ModelError),
    /// Not run because an ancestor failed
    Skipped { failed_ancestor: NodeId },
}

impl NodeStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, NodeStatus::Succeeded(_))
    }
}

/// Per-node outcome of one execution
#[derive(Debug, Default)]
pub struct ExecutionReport {
    statuses: BTreeMap<NodeId, NodeStatus>,
}

impl ExecutionReport {
    pub fn status(&self, id: NodeId) -> Option<&NodeStatus> {
        self.statuses.get(&id)
    }

    /// Nodes that were part of the run, in id order
    pub fn executed(&self) -> Vec<NodeId> {
        self.statuses.keys().copied().collect()
    }

    pub fn failures(&self) -> Vec<NodeId> {
        self.statuses
            .iter()
            .filter(|(_, s)| matches!(s, NodeStatus::Failed(_)))
            .map(|(id, _)| *id)
            .collect()
    }

    /// The value of `target`, or the error of the lowest-id failed node
    ///
    /// Every node in the report belongs to the ancestor closure of the target
    /// it was executed for.
    pub fn into_result(self, target: NodeId) -> Result<Arc<Value>> {
        match self.statuses.get(&target) {
            Some(NodeStatus::Succeeded(value)) => return Ok(Arc::clone(value)),
            Some(_) => {}
            None => {
                return Err(ModelError::Pipeline(format!(
                    "node {} was not executed",
                    target
                )))
            }
        }

        let first_failure = self.statuses.into_values().find_map(|status| match status {
            NodeStatus::Failed(err) => Some(err),
            _ => None,
        });
        match first_failure {
            Some(err) => Err(err),
            None => Err(ModelError::Pipeline(format!(
                "node {} did not succeed and no failure was recorded",
                target
            ))),
        }
    }
}

/// Runs graph nodes, in parallel unless configured otherwise
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    parallel: bool,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl Scheduler {
    pub fn new(parallel: bool) -> Self {
        Self { parallel }
    }

    pub fn sequential() -> Self {
        Self { parallel: false }
    }

    /// Run the ancestor closure of `target` and report every node's outcome
    pub fn execute(&self, graph: &TaskGraph, target: NodeId) -> Result<ExecutionReport> {
        let closure = graph.ancestors(target)?;
        let mut report = ExecutionReport::default();

        for (depth, wave) in graph.waves(&closure).into_iter().enumerate() {
            let mut ready = Vec::with_capacity(wave.len());
            for id in wave {
                match gather_inputs(graph, &report, id)? {
                    Ok(inputs) => ready.push((id, inputs)),
                    Err(failed_ancestor) => {
                        log::debug!(
                            "Skipping '{}': upstream '{}' failed",
                            graph.name(id),
                            graph.name(failed_ancestor)
                        );
                        report
                            .statuses
                            .insert(id, NodeStatus::Skipped { failed_ancestor });
                    }
                }
            }

            log::debug!("Wave {}: running {} node(s)", depth, ready.len());

            let run = |(id, inputs): (NodeId, Vec<Arc<Value>>)| (id, run_node(graph, id, &inputs));
            let results: Vec<(NodeId, Result<Value>)> = if self.parallel {
                ready.into_par_iter().map(run).collect()
            } else {
                ready.into_iter().map(run).collect()
            };

            for (id, result) in results {
                let status = match result {
                    Ok(value) => NodeStatus::Succeeded(Arc::new(value)),
                    Err(err) => {
                        log::error!(
                            "Node '{}' failed: {} ({} direct dependent(s) will be skipped)",
                            graph.name(id),
                            err,
                            graph.dependents(id).len()
                        );
                        NodeStatus::Failed(err)
                    }
                };
                report.statuses.insert(id, status);
            }
        }

        Ok(report)
    }

    /// Run what `target` needs and return its value
    pub fn materialize(&self, graph: &TaskGraph, target: NodeId) -> Result<Arc<Value>> {
        self.execute(graph, target)?.into_result(target)
    }
}

/// Inputs of `id` if every one succeeded, else the failed ancestor to blame
fn gather_inputs(
    graph: &TaskGraph,
    report: &ExecutionReport,
    id: NodeId,
) -> Result<std::result::Result<Vec<Arc<Value>>, NodeId>> {
    let mut inputs = Vec::new();
    for input in graph.node(id)?.task.inputs() {
        match report.statuses.get(&input) {
            Some(NodeStatus::Succeeded(value)) => inputs.push(Arc::clone(value)),
            Some(NodeStatus::Failed(_)) => return Ok(Err(input)),
            Some(NodeStatus::Skipped { failed_ancestor }) => return Ok(Err(*failed_ancestor)),
            None => {
                return Err(ModelError::Pipeline(format!(
                    "input {} of '{}' has not run",
                    input,
                    graph.name(id)
                )))
            }
        }
    }
    Ok(Ok(inputs))
}

fn run_node(graph: &TaskGraph, id: NodeId, inputs: &[Arc<Value>]) -> Result<Value> {
    let node = graph.node(id)?;
    let start = Instant::now();

    let value = match &node.task {
        Task::Load { table, path, fill } => {
            let raw = load_table(path, *fill)?;
            match table {
                SourceTable::Assumptions => Value::Assumptions(AssumptionTable::from_raw(&raw)?),
                SourceTable::PopulationGrowth => Value::Growth(GrowthTable::from_raw(&raw)?),
                SourceTable::AcuteActivity => {
                    Value::Activity(ActivityTable::from_raw(&raw, Domain::Acute)?)
                }
                SourceTable::CommunityActivity => {
                    Value::Activity(ActivityTable::from_raw(&raw, Domain::Community)?)
                }
            }
        }
        Task::Forecast { config, .. } => {
            let engine = ForecastEngine::new(config.clone());
            Value::Forecast(engine.project(inputs[0].as_activity()?, inputs[1].as_growth()?)?)
        }
        Task::Reallocate { config, .. } => {
            let engine = ReallocationEngine::new(config.clone());
            Value::Combined(engine.reallocate(
                inputs[0].as_forecast()?,
                inputs[1].as_forecast()?,
                inputs[2].as_assumptions()?,
            )?)
        }
    };

    log::debug!(
        "Node '{}' produced {} rows in {:?}",
        node.name,
        value.rows(),
        start.elapsed()
    );
    Ok(value)
}
