// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Graph Builder: flat repository listing to node/edge graph

use crate::error::GraphError;
use crate::types::{Entry, GraphEdge, GraphNode, RepoGraph};
use anyhow::{Context, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Split a path into `(parent, name)` at the last `/`
///
/// The parent is empty for top-level paths.
#[must_use]
pub fn split_path(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(pos) => (&path[..pos], &path[pos + 1..]),
        None => ("", path),
    }
}

/// Build the canonical graph from a listing
///
/// One node per entry, in entry order. An edge `parent -> path` is emitted
/// only when the parent directory was already emitted earlier in the same
/// pass; children listed before their parent lose their edge. Repeated paths
/// are skipped so node ids stay unique.
pub fn build_graph(entries: &[Entry]) -> Result<RepoGraph, GraphError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(entries.len());
    let mut graph = RepoGraph {
        nodes: Vec::with_capacity(entries.len()),
        edges: Vec::new(),
    };
    let mut dropped = 0usize;

    for (index, entry) in entries.iter().enumerate() {
        if entry.path.is_empty() {
            return Err(GraphError::MalformedEntry { index });
        }
        if !seen.insert(entry.path.as_str()) {
            warn!("Duplicate entry path skipped: {}", entry.path);
            continue;
        }

        let (parent, name) = split_path(&entry.path);
        graph.nodes.push(GraphNode {
            id: entry.path.clone(),
            name: name.to_string(),
            group: entry.kind,
        });

        if parent.is_empty() {
            continue;
        }
        if seen.contains(parent) {
            graph.edges.push(GraphEdge {
                source: parent.to_string(),
                target: entry.path.clone(),
            });
        } else {
            dropped += 1;
        }
    }

    if dropped > 0 {
        debug!("{} edge(s) dropped: parent listed after child", dropped);
    }
    debug!(
        "Built graph: {} nodes, {} edges",
        graph.nodes.len(),
        graph.edges.len()
    );
    Ok(graph)
}

/// Keep nodes whose name contains `term` (case-insensitive) and the edges
/// between survivors
///
/// An empty term returns the graph unchanged.
#[must_use]
pub fn filter_graph(graph: &RepoGraph, term: &str) -> RepoGraph {
    if term.is_empty() {
        return graph.clone();
    }

    let needle = term.to_lowercase();
    let nodes: Vec<GraphNode> = graph
        .nodes
        .iter()
        .filter(|n| n.name.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    let keep: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let edges = graph
        .edges
        .iter()
        .filter(|e| keep.contains(e.source.as_str()) && keep.contains(e.target.as_str()))
        .cloned()
        .collect();

    RepoGraph { nodes, edges }
}

impl RepoGraph {
    /// Get a node by id
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Whether a node with this id exists
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// Get node count
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get edge count
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Check if the graph is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get edges from a specific node
    #[must_use]
    pub fn edges_from(&self, id: &str) -> Vec<&GraphEdge> {
        self.edges.iter().filter(|e| e.source == id).collect()
    }

    /// Get edges to a specific node
    #[must_use]
    pub fn edges_to(&self, id: &str) -> Vec<&GraphEdge> {
        self.edges.iter().filter(|e| e.target == id).collect()
    }

    /// Outgoing edge count per node id
    #[must_use]
    pub fn child_counts(&self) -> HashMap<&str, usize> {
        let mut counts: HashMap<&str, usize> =
            self.nodes.iter().map(|n| (n.id.as_str(), 0)).collect();
        for edge in &self.edges {
            if let Some(c) = counts.get_mut(edge.source.as_str()) {
                *c += 1;
            }
        }
        counts
    }

    /// Directed petgraph view over borrowed nodes
    ///
    /// Edges whose endpoints are missing are skipped.
    #[must_use]
    pub fn to_petgraph(&self) -> (DiGraph<&GraphNode, ()>, HashMap<&str, NodeIndex>) {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.edges.len());
        let mut indices = HashMap::with_capacity(self.nodes.len());

        for node in &self.nodes {
            let idx = graph.add_node(node);
            indices.insert(node.id.as_str(), idx);
        }
        for edge in &self.edges {
            if let (Some(&from), Some(&to)) = (
                indices.get(edge.source.as_str()),
                indices.get(edge.target.as_str()),
            ) {
                graph.add_edge(from, to, ());
            }
        }

        (graph, indices)
    }

    /// Ids adjacent to `id` in either direction
    #[must_use]
    pub fn neighbors(&self, id: &str) -> HashSet<&str> {
        let (graph, indices) = self.to_petgraph();
        let Some(&idx) = indices.get(id) else {
            return HashSet::new();
        };
        graph
            .neighbors_undirected(idx)
            .map(|n| graph[n].id.as_str())
            .collect()
    }

    /// Number of connected pieces when edges are read undirected
    #[must_use]
    pub fn component_count(&self) -> usize {
        let (graph, _) = self.to_petgraph();
        petgraph::algo::connected_components(&graph)
    }

    /// Export to DOT format for Graphviz
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph repository {\n");
        dot.push_str("  rankdir=LR;\n");
        dot.push_str("  node [shape=box, style=rounded];\n\n");

        for node in &self.nodes {
            dot.push_str(&format!(
                "  \"{}\" [label=\"{}\", group=\"{}\"];\n",
                escape(&node.id),
                escape(&node.name),
                node.group
            ));
        }

        dot.push('\n');

        for edge in &self.edges {
            dot.push_str(&format!(
                "  \"{}\" -> \"{}\";\n",
                escape(&edge.source),
                escape(&edge.target)
            ));
        }

        dot.push_str("}\n");
        dot
    }

    /// Export to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize graph to JSON")
    }

    /// Export to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize graph to TOML")
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
