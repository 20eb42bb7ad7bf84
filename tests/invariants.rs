// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Invariant tests for the graph, tree and view builders
//!
//! These tests verify:
//! 1. Edge validity - every edge joins two emitted nodes, parent to child
//! 2. Filter soundness - filtered nodes match the term, edges stay inside
//! 3. Tree synthesis - every path prefix has a tree node, built idempotently
//! 4. Ordering - parent-first listings keep every parent edge

use proptest::prelude::*;
use repograph::graph::{build_graph, filter_graph, split_path};
use repograph::tree::{build_tree, build_tree_from_paths, flatten};
use repograph::types::{Entry, EntryKind, RepoGraph, TreeNode};
use repograph::view::ViewState;
use std::collections::{BTreeSet, HashSet};

// =============================================================================
// Test Helpers
// =============================================================================

fn path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-cA-C]{1,2}", 1..=4).prop_map(|segs| segs.join("/"))
}

fn paths_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(path_strategy(), 0..24)
}

fn entries(paths: &[String]) -> Vec<Entry> {
    paths.iter().map(|p| Entry::blob(p.as_str())).collect()
}

/// Every prefix of every path, parents sorted before children
fn complete_listing(paths: &[String]) -> Vec<Entry> {
    let mut all = BTreeSet::new();
    for path in paths {
        let mut prefix = String::new();
        for seg in path.split('/') {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(seg);
            all.insert(prefix.clone());
        }
    }
    all.into_iter()
        .map(|p| {
            let is_dir = paths.iter().any(|q| q.starts_with(&format!("{p}/")));
            Entry::new(p, if is_dir { EntryKind::Tree } else { EntryKind::Blob })
        })
        .collect()
}

fn tree_ids(root: &TreeNode) -> HashSet<String> {
    flatten(root).into_iter().map(|r| r.node.id.clone()).collect()
}

fn listing(paths: &[&str]) -> Vec<Entry> {
    paths
        .iter()
        .map(|p| {
            if p.contains('.') {
                Entry::blob(*p)
            } else {
                Entry::tree(*p)
            }
        })
        .collect()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn test_edges_join_emitted_nodes(paths in paths_strategy()) {
        let graph = build_graph(&entries(&paths)).unwrap();
        let ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();

        for edge in &graph.edges {
            prop_assert!(ids.contains(edge.source.as_str()));
            prop_assert!(ids.contains(edge.target.as_str()));
            prop_assert_eq!(split_path(&edge.target).0, edge.source.as_str());
        }
    }

    #[test]
    fn test_node_ids_unique_and_in_order(paths in paths_strategy()) {
        let graph = build_graph(&entries(&paths)).unwrap();

        let mut seen = HashSet::new();
        let expected: Vec<&str> = paths
            .iter()
            .map(String::as_str)
            .filter(|p| seen.insert(*p))
            .collect();
        let actual: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn test_filter_soundness(paths in paths_strategy(), term in "[a-cA-C]{1,2}") {
        let graph = build_graph(&complete_listing(&paths)).unwrap();
        let filtered = filter_graph(&graph, &term);
        let needle = term.to_lowercase();

        let kept: HashSet<&str> = filtered.nodes.iter().map(|n| n.id.as_str()).collect();
        for node in &filtered.nodes {
            prop_assert!(node.name.to_lowercase().contains(&needle));
            prop_assert!(graph.contains(&node.id));
        }
        for edge in &filtered.edges {
            prop_assert!(kept.contains(edge.source.as_str()));
            prop_assert!(kept.contains(edge.target.as_str()));
            prop_assert!(graph.edges.contains(edge));
        }
        // nothing matching was dropped
        let matching = graph
            .nodes
            .iter()
            .filter(|n| n.name.to_lowercase().contains(&needle))
            .count();
        prop_assert_eq!(filtered.node_count(), matching);
    }

    #[test]
    fn test_empty_filter_is_identity(paths in paths_strategy()) {
        let graph = build_graph(&complete_listing(&paths)).unwrap();
        prop_assert_eq!(filter_graph(&graph, ""), graph);
    }

    #[test]
    fn test_tree_synthesises_every_prefix(paths in paths_strategy()) {
        let tree = build_tree_from_paths(paths.iter().map(String::as_str));
        let ids = tree_ids(&tree);

        for entry in complete_listing(&paths) {
            prop_assert!(ids.contains(&entry.path), "missing {}", entry.path);
        }
        prop_assert_eq!(ids.len(), complete_listing(&paths).len());
    }

    #[test]
    fn test_tree_insert_is_idempotent(paths in paths_strategy()) {
        let graph = build_graph(&entries(&paths)).unwrap();
        let once = build_tree(&graph.nodes);

        let mut doubled = graph.nodes.clone();
        doubled.extend(graph.nodes.iter().cloned());
        prop_assert_eq!(build_tree(&doubled), once);
    }

    #[test]
    fn test_parent_first_listing_keeps_all_edges(paths in paths_strategy()) {
        let listing = complete_listing(&paths);
        let graph = build_graph(&listing).unwrap();

        let nested = listing.iter().filter(|e| e.path.contains('/')).count();
        prop_assert_eq!(graph.edge_count(), nested);
    }

    #[test]
    fn test_view_filter_tracks_term(paths in paths_strategy(), term in "[a-c]{0,2}") {
        let mut view = ViewState::default();
        view.load_entries(&complete_listing(&paths)).unwrap();
        view.set_search_term(term.clone());

        let expected = filter_graph(view.graph(), &term);
        prop_assert_eq!(view.filtered_view().as_ref(), &expected);
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_small_repository_scenario() {
    let graph = build_graph(&listing(&["README.md", "src", "src/index.js"])).unwrap();

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.edges[0].source, "src");
    assert_eq!(graph.edges[0].target, "src/index.js");
    assert_eq!(graph.node("src").unwrap().group, EntryKind::Tree);
    assert_eq!(graph.node("src/index.js").unwrap().name, "index.js");

    let tree = build_tree(&graph.nodes);
    let names: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["README.md", "src"]);
    assert_eq!(tree.child("src").unwrap().children[0].id, "src/index.js");
}

#[test]
fn test_child_before_parent_loses_edge() {
    let graph = build_graph(&listing(&["a/b.txt", "a"])).unwrap();

    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 0);

    // the tree still nests the file under its directory
    let tree = build_tree(&graph.nodes);
    assert_eq!(tree.children.len(), 1);
    assert_eq!(tree.children[0].children[0].id, "a/b.txt");
}

#[test]
fn test_search_keeps_only_edges_between_survivors() {
    let graph = build_graph(&listing(&["docs", "docs/readme.md", "src", "src/main.rs"])).unwrap();
    let filtered = filter_graph(&graph, "README");

    assert_eq!(filtered.node_count(), 1);
    assert_eq!(filtered.nodes[0].id, "docs/readme.md");
    assert!(filtered.edges.is_empty());
}

#[test]
fn test_empty_listing() {
    let graph = build_graph(&[]).unwrap();
    assert_eq!(graph, RepoGraph::default());
    assert!(build_tree(&graph.nodes).is_leaf());
}
