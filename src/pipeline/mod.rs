//! Lazily evaluated model pipeline
//!
//! Building a [`TaskGraph`] only declares nodes and their inputs; a
//! [`Scheduler`] later runs exactly what a requested node needs.

mod graph;
mod scheduler;
mod value;
pub mod model;

#[cfg(test)]
pub(crate) mod fixtures;

pub use graph::{Node, NodeId, Task, TaskGraph};
pub use model::{build_graph, run, run_to_file, ModelGraph};
pub use scheduler::{ExecutionReport, NodeStatus, Scheduler};
pub use value::Value;
