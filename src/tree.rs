// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Tree Builder: hierarchical projection of a listing
//!
//! Tree node ids are cumulative path prefixes. Every directory implied by a
//! path gets a node, whether or not the listing named it.

use crate::types::{GraphNode, TreeNode};
use std::collections::HashMap;

/// Incremental prefix-tree builder
///
/// Inserting a path that is already present is a no-op, so feeding the same
/// paths twice yields the same tree.
#[derive(Debug)]
pub struct TreeBuilder {
    /// Arena of `(id, name, children)`; slot 0 is the root
    slots: Vec<(String, String, Vec<usize>)>,
    /// Prefix to arena slot; the root is not keyed
    index: HashMap<String, usize>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    /// Builder holding only the synthetic root
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: vec![(
                TreeNode::ROOT_ID.to_string(),
                TreeNode::ROOT_ID.to_string(),
                Vec::new(),
            )],
            index: HashMap::new(),
        }
    }

    /// Walk the prefix chain of `path`, creating missing nodes
    ///
    /// Segments are taken verbatim, empty ones included, so every node id is
    /// a prefix of the entry path itself: `a//b` yields `a`, `a/` and `a//b`.
    pub fn insert(&mut self, path: &str) {
        if path.is_empty() {
            return;
        }
        let mut parent = 0;
        let mut end = 0;

        for segment in path.split('/') {
            end += segment.len();
            let prefix = &path[..end];
            end += 1;

            parent = match self.index.get(prefix) {
                Some(&slot) => slot,
                None => {
                    let slot = self.slots.len();
                    self.slots
                        .push((prefix.to_string(), segment.to_string(), Vec::new()));
                    self.slots[parent].2.push(slot);
                    self.index.insert(prefix.to_string(), slot);
                    slot
                }
            };
        }
    }

    /// Number of nodes including the root
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether only the root exists
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.len() == 1
    }

    /// Materialise the nested tree
    #[must_use]
    pub fn build(&self) -> TreeNode {
        self.materialise(0)
    }

    fn materialise(&self, slot: usize) -> TreeNode {
        let (id, name, children) = &self.slots[slot];
        TreeNode {
            id: id.clone(),
            name: name.clone(),
            children: children.iter().map(|&c| self.materialise(c)).collect(),
        }
    }
}

/// Build the hierarchy for a node list
#[must_use]
pub fn build_tree(nodes: &[GraphNode]) -> TreeNode {
    let mut builder = TreeBuilder::new();
    for node in nodes {
        builder.insert(&node.id);
    }
    builder.build()
}

/// Build the hierarchy straight from paths
#[must_use]
pub fn build_tree_from_paths<'a>(paths: impl IntoIterator<Item = &'a str>) -> TreeNode {
    let mut builder = TreeBuilder::new();
    for path in paths {
        builder.insert(path);
    }
    builder.build()
}

/// A tree node flattened for list display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow<'a> {
    /// The node
    pub node: &'a TreeNode,
    /// Nesting depth; children of the root are at 0
    pub depth: usize,
}

/// Depth-first rows below the root, root excluded
#[must_use]
pub fn flatten(root: &TreeNode) -> Vec<TreeRow<'_>> {
    fn walk<'a>(node: &'a TreeNode, depth: usize, out: &mut Vec<TreeRow<'a>>) {
        out.push(TreeRow { node, depth });
        for child in &node.children {
            walk(child, depth + 1, out);
        }
    }

    let mut rows = Vec::new();
    for child in &root.children {
        walk(child, 0, &mut rows);
    }
    rows
}
