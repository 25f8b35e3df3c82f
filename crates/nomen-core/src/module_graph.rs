//! Module dependency graph built from recorded dependency edges
//!
//! The writer feeds each emitted type's module edges into a `ModuleGraph`
//! and asks for an emission order in which every module follows the modules
//! it depends on.

use std::collections::HashMap;

use petgraph::algo::{is_cyclic_directed, kosaraju_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;

use crate::error::CoreError;
use crate::module::ModuleDependency;

#[derive(Debug, Default)]
pub struct ModuleGraph {
    /// Edges point from a module to the modules it depends on
    graph: DiGraph<String, ()>,
    indices: HashMap<String, NodeIndex>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_module(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.indices.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.indices.insert(name.to_string(), idx);
        idx
    }

    /// Record every edge of `dependencies` as outgoing from `from`
    pub fn add_edges(&mut self, from: &str, dependencies: &[ModuleDependency]) {
        let from_idx = self.add_module(from);
        for dependency in dependencies {
            if dependency.dependency_name == from {
                continue;
            }
            let to_idx = self.add_module(&dependency.dependency_name);
            if self.graph.find_edge(from_idx, to_idx).is_none() {
                debug!("Module edge {} -> {}", from, dependency.dependency_name);
                self.graph.add_edge(from_idx, to_idx, ());
            }
        }
    }

    pub fn module_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn depends_on(&self, from: &str, to: &str) -> bool {
        match (self.indices.get(from), self.indices.get(to)) {
            (Some(&from_idx), Some(&to_idx)) => self.graph.find_edge(from_idx, to_idx).is_some(),
            _ => false,
        }
    }

    /// Modules ordered dependencies-first
    pub fn topological_order(&self) -> Result<Vec<String>, CoreError> {
        if is_cyclic_directed(&self.graph) {
            let cycles = self
                .cycles()
                .into_iter()
                .map(|cycle| cycle.join(" <-> "))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(CoreError::CircularDependency(cycles));
        }

        toposort(&self.graph, None)
            .map(|indices| {
                indices
                    .into_iter()
                    .rev()
                    .map(|idx| self.graph[idx].clone())
                    .collect()
            })
            .map_err(|_| CoreError::CircularDependency("Failed to sort modules".to_string()))
    }

    /// Groups of modules that depend on each other
    pub fn cycles(&self) -> Vec<Vec<String>> {
        kosaraju_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| {
                let mut names: Vec<String> =
                    scc.into_iter().map(|idx| self.graph[idx].clone()).collect();
                names.sort();
                names
            })
            .collect()
    }
}
