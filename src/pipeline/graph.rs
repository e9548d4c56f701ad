//! Declarative task graph
//!
//! Adding a node records what it computes and which nodes feed it; nothing is
//! loaded or computed until a [`Scheduler`](super::Scheduler) runs the graph.
//! A node may only refer to nodes added before it, so node ids are already a
//! topological order and the graph cannot contain a cycle.

use crate::error::{ModelError, Result};
use crate::projection::ForecastConfig;
use crate::reallocation::ReallocationConfig;
use crate::source::{FillPolicy, SourceTable};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// Handle to a node in a [`TaskGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node computes
#[derive(Debug, Clone)]
pub enum Task {
    /// Read one source table from disk
    Load {
        table: SourceTable,
        path: PathBuf,
        fill: FillPolicy,
    },
    /// Project historic activity with growth rates
    Forecast {
        historic: NodeId,
        growth: NodeId,
        config: ForecastConfig,
    },
    /// Combine two forecasts and apply the community shift
    Reallocate {
        acute: NodeId,
        community: NodeId,
        assumptions: NodeId,
        config: ReallocationConfig,
    },
}

impl Task {
    /// Input nodes, in argument order
    pub fn inputs(&self) -> Vec<NodeId> {
        match self {
            Task::Load { .. } => Vec::new(),
            Task::Forecast {
                historic, growth, ..
            } => vec![*historic, *growth],
            Task::Reallocate {
                acute,
                community,
                assumptions,
                ..
            } => vec![*acute, *community, *assumptions],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub task: Task,
}

#[derive(Debug, Clone, Default)]
pub struct TaskGraph {
    nodes: Vec<Node>,
}

impl TaskGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_load(
        &mut self,
        name: impl Into<String>,
        table: SourceTable,
        path: impl Into<PathBuf>,
        fill: FillPolicy,
    ) -> NodeId {
        self.push_unchecked(
            name.into(),
            Task::Load {
                table,
                path: path.into(),
                fill,
            },
        )
    }

    pub fn add_forecast(
        &mut self,
        name: impl Into<String>,
        historic: NodeId,
        growth: NodeId,
        config: ForecastConfig,
    ) -> Result<NodeId> {
        self.push(
            name.into(),
            Task::Forecast {
                historic,
                growth,
                config,
            },
        )
    }

    pub fn add_reallocation(
        &mut self,
        name: impl Into<String>,
        acute: NodeId,
        community: NodeId,
        assumptions: NodeId,
        config: ReallocationConfig,
    ) -> Result<NodeId> {
        self.push(
            name.into(),
            Task::Reallocate {
                acute,
                community,
                assumptions,
                config,
            },
        )
    }

    fn push(&mut self, name: String, task: Task) -> Result<NodeId> {
        if let Some(unknown) = task.inputs().into_iter().find(|id| id.0 >= self.nodes.len()) {
            return Err(ModelError::Pipeline(format!(
                "node '{}' refers to unknown node {}",
                name, unknown
            )));
        }
        Ok(self.push_unchecked(name, task))
    }

    fn push_unchecked(&mut self, name: String, task: Task) -> NodeId {
        self.nodes.push(Node { name, task });
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| ModelError::Pipeline(format!("unknown node {}", id)))
    }

    pub fn name(&self, id: NodeId) -> &str {
        self.nodes.get(id.0).map(|n| n.name.as_str()).unwrap_or("<unknown>")
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes that take `id` as a direct input
    pub fn dependents(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.task.inputs().contains(&id))
            .map(|(i, _)| NodeId(i))
            .collect()
    }

    /// `target` and everything it transitively depends on, in topological order
    pub fn ancestors(&self, target: NodeId) -> Result<Vec<NodeId>> {
        self.node(target)?;
        let mut closure = BTreeSet::new();
        let mut stack = vec![target];
        while let Some(id) = stack.pop() {
            if closure.insert(id) {
                stack.extend(self.nodes[id.0].task.inputs());
            }
        }
        Ok(closure.into_iter().collect())
    }

    /// Group nodes into waves; a node's inputs all sit in earlier waves
    ///
    /// `ids` must be closed under inputs (e.g. the result of [`ancestors`]).
    ///
    /// [`ancestors`]: TaskGraph::ancestors
    pub fn waves(&self, ids: &[NodeId]) -> Vec<Vec<NodeId>> {
        let mut level = vec![0usize; self.nodes.len()];
        let mut waves: Vec<Vec<NodeId>> = Vec::new();

        let mut sorted = ids.to_vec();
        sorted.sort();
        for id in sorted {
            let depth = self.nodes[id.0]
                .task
                .inputs()
                .iter()
                .map(|input| level[input.0] + 1)
                .max()
                .unwrap_or(0);
            level[id.0] = depth;
            if waves.len() <= depth {
                waves.resize_with(depth + 1, Vec::new);
            }
            waves[depth].push(id);
        }
        waves
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> (TaskGraph, [NodeId; 7]) {
        let mut graph = TaskGraph::new();
        let assumptions = graph.add_load("a", SourceTable::Assumptions, "a.csv", FillPolicy::NoFill);
        let growth = graph.add_load("g", SourceTable::PopulationGrowth, "g.csv", FillPolicy::FillZero);
        let acute = graph.add_load("ac", SourceTable::AcuteActivity, "ac.csv", FillPolicy::FillZero);
        let community =
            graph.add_load("co", SourceTable::CommunityActivity, "co.csv", FillPolicy::FillZero);
        let fa = graph
            .add_forecast("fa", acute, growth, ForecastConfig::default())
            .unwrap();
        let fc = graph
            .add_forecast("fc", community, growth, ForecastConfig::default())
            .unwrap();
        let out = graph
            .add_reallocation("out", fa, fc, assumptions, ReallocationConfig::default())
            .unwrap();
        (graph, [assumptions, growth, acute, community, fa, fc, out])
    }

    #[test]
    fn test_unknown_input_rejected() {
        let mut graph = TaskGraph::new();
        let load = graph.add_load("ac", SourceTable::AcuteActivity, "ac.csv", FillPolicy::FillZero);
        let err = graph
            .add_forecast("fa", load, NodeId(5), ForecastConfig::default())
            .unwrap_err();
        assert!(matches!(err, ModelError::Pipeline(_)));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_ancestors_of_forecast_excludes_unrelated_nodes() {
        let (graph, [assumptions, growth, acute, community, fa, fc, _]) = diamond();
        let closure = graph.ancestors(fa).unwrap();
        assert_eq!(closure, vec![growth, acute, fa]);
        assert!(!closure.contains(&assumptions));
        assert!(!closure.contains(&community));
        assert!(!closure.contains(&fc));
    }

    #[test]
    fn test_waves_respect_dependencies() {
        let (graph, [assumptions, growth, acute, community, fa, fc, out]) = diamond();
        let waves = graph.waves(&graph.ancestors(out).unwrap());
        assert_eq!(waves.len(), 3);
        assert_eq!(waves[0], vec![assumptions, growth, acute, community]);
        assert_eq!(waves[1], vec![fa, fc]);
        assert_eq!(waves[2], vec![out]);
    }

    #[test]
    fn test_dependents() {
        let (graph, [assumptions, growth, _, _, fa, fc, out]) = diamond();
        assert_eq!(graph.dependents(growth), vec![fa, fc]);
        assert_eq!(graph.dependents(assumptions), vec![out]);
        assert!(graph.dependents(out).is_empty());
    }

    #[test]
    fn test_unknown_target() {
        let (graph, _) = diamond();
        assert!(graph.ancestors(NodeId(99)).is_err());
        assert_eq!(graph.name(NodeId(99)), "<unknown>");
    }
}
