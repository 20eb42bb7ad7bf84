// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! View-State Engine
//!
//! Single source of truth for what the renderer and the tree display show.
//! Derived fields follow two rules:
//!
//! - graph changed -> rebuild tree, recompute filtered view
//! - search term changed -> recompute filtered view
//!
//! Graph identity for recomputation is the `Arc` installed by
//! [`ViewState::set_graph`], never the field contents of its nodes.

use crate::error::GraphError;
use crate::graph::{build_graph, filter_graph};
use crate::tree::build_tree;
use crate::types::{Entry, GraphNode, NodeId, RepoGraph, TreeNode};
use std::sync::Arc;
use tracing::debug;

/// User preferences that survive graph replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewPrefs {
    /// Draw node labels
    pub show_labels: bool,
    /// Show the hierarchy panel
    pub tree_visible: bool,
}

impl Default for ViewPrefs {
    fn default() -> Self {
        Self {
            show_labels: true,
            tree_visible: true,
        }
    }
}

/// Session-scoped projection currently shown to the user
#[derive(Debug, Clone)]
pub struct ViewState {
    graph: Arc<RepoGraph>,
    tree: TreeNode,
    search_term: String,
    filtered: Arc<RepoGraph>,
    selected: Option<NodeId>,
    prefs: ViewPrefs,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(ViewPrefs::default())
    }
}

impl ViewState {
    /// Empty state with the given preferences
    #[must_use]
    pub fn new(prefs: ViewPrefs) -> Self {
        let graph = Arc::new(RepoGraph::default());
        Self {
            filtered: Arc::clone(&graph),
            graph,
            tree: TreeNode::root(),
            search_term: String::new(),
            selected: None,
            prefs,
        }
    }

    /// Replace the graph wholesale
    ///
    /// Clears the selection and rebuilds the tree and the filtered view.
    pub fn set_graph(&mut self, graph: RepoGraph) {
        let graph = Arc::new(graph);
        let tree = build_tree(&graph.nodes);
        self.graph = graph;
        self.tree = tree;
        self.selected = None;
        self.refilter();
    }

    /// Build a graph from a listing and install it
    ///
    /// On error nothing changes: graph, tree and filtered view stay as they
    /// were.
    pub fn load_entries(&mut self, entries: &[Entry]) -> Result<(), GraphError> {
        let graph = build_graph(entries)?;
        self.set_graph(graph);
        Ok(())
    }

    /// Update the search term; only the filtered view is recomputed
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term == self.search_term {
            return;
        }
        self.search_term = term;
        self.refilter();
    }

    fn refilter(&mut self) {
        self.filtered = if self.search_term.is_empty() {
            Arc::clone(&self.graph)
        } else {
            Arc::new(filter_graph(&self.graph, &self.search_term))
        };
        debug!(
            "Filtered view: {}/{} nodes for {:?}",
            self.filtered.node_count(),
            self.graph.node_count(),
            self.search_term
        );
    }

    /// Graph handed to the renderer
    ///
    /// With an empty search term this is the full graph itself.
    #[must_use]
    pub fn filtered_view(&self) -> &Arc<RepoGraph> {
        &self.filtered
    }

    /// Full graph from the last successful load
    #[must_use]
    pub fn graph(&self) -> &Arc<RepoGraph> {
        &self.graph
    }

    /// Hierarchy derived from the full graph
    #[must_use]
    pub fn tree(&self) -> &TreeNode {
        &self.tree
    }

    /// Active search term
    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Record a selection
    ///
    /// Membership is not checked; callers pass ids of live nodes.
    pub fn select(&mut self, id: impl Into<NodeId>) {
        self.selected = Some(id.into());
    }

    /// Drop the selection
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Selected id, if any
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Selected node when it exists in the current graph
    #[must_use]
    pub fn selected_node(&self) -> Option<&GraphNode> {
        self.selected.as_deref().and_then(|id| self.graph.node(id))
    }

    /// Flip label visibility
    pub fn toggle_labels(&mut self) {
        self.prefs.show_labels = !self.prefs.show_labels;
    }

    /// Flip tree panel visibility
    pub fn toggle_tree(&mut self) {
        self.prefs.tree_visible = !self.prefs.tree_visible;
    }

    /// Whether labels are drawn
    #[must_use]
    pub fn show_labels(&self) -> bool {
        self.prefs.show_labels
    }

    /// Whether the tree panel is shown
    #[must_use]
    pub fn tree_visible(&self) -> bool {
        self.prefs.tree_visible
    }

    /// Current preferences
    #[must_use]
    pub fn prefs(&self) -> ViewPrefs {
        self.prefs
    }
}
