// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Renderer side table: force-directed positions and node styling
//!
//! Simulation state lives here, keyed by node id, and never on the
//! canonical [`GraphNode`].

use crate::types::{EntryKind, GraphNode, NodeId, RepoGraph};
use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f64::consts::PI;

/// Base node radius
pub const NODE_RADIUS: f64 = 5.0;

/// Radius of the ring new nodes are seeded on
const SEED_RADIUS: f64 = 100.0;

/// Simulation tick length in seconds
const TICK: f32 = 0.016;

// =============================================================================
// Styling
// =============================================================================

/// Node radius from the number of direct children
#[must_use]
pub fn node_radius(_node: &GraphNode, child_count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let children = child_count as f64;
    NODE_RADIUS + children.sqrt()
}

/// Colour theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light text on dark background
    #[default]
    Dark,
    /// Dark text on light background
    Light,
}

impl Theme {
    /// The other theme
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Palette for this theme
    #[must_use]
    pub fn palette(self) -> Palette {
        match self {
            Self::Dark => Palette::from_pairs(
                &[
                    ("tree", "#ff7f0e"),
                    ("blob", "#1f77b4"),
                    ("commit", "#2ca02c"),
                    ("tag", "#d62728"),
                ],
                "#7f7f7f",
                "#1a1a2e",
            ),
            Self::Light => Palette::from_pairs(
                &[
                    ("tree", "#d35400"),
                    ("blob", "#2c3e50"),
                    ("commit", "#27ae60"),
                    ("tag", "#c0392b"),
                ],
                "#95a5a6",
                "#fdfdfd",
            ),
        }
    }
}

/// Group-to-colour mapping with a fallback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    groups: HashMap<String, String>,
    fallback: String,
    background: String,
}

impl Palette {
    /// Build from `(group, "#rrggbb")` pairs
    #[must_use]
    pub fn from_pairs(pairs: &[(&str, &str)], fallback: &str, background: &str) -> Self {
        Self {
            groups: pairs
                .iter()
                .map(|(g, c)| ((*g).to_string(), (*c).to_string()))
                .collect(),
            fallback: fallback.to_string(),
            background: background.to_string(),
        }
    }

    /// Colour token for a group
    #[must_use]
    pub fn color_for(&self, group: EntryKind) -> &str {
        self.color_for_name(group.as_str())
    }

    /// Colour token for a group name; unknown names get the fallback
    #[must_use]
    pub fn color_for_name(&self, group: &str) -> &str {
        self.groups.get(group).unwrap_or(&self.fallback)
    }

    /// Canvas background
    #[must_use]
    pub fn background(&self) -> &str {
        &self.background
    }
}

// =============================================================================
// Force layout
// =============================================================================

/// Force simulation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Repulsion between every node pair
    pub charge: f32,
    /// Attraction along edges
    pub spring: f32,
    /// Clamp on the per-tick force
    pub max_force: f32,
    /// Velocity scale
    pub node_speed: f32,
    /// Velocity decay per tick
    pub damping: f32,
    /// Ticks run before a static layout is read
    pub steps: usize,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            charge: 150.0,
            spring: 0.05,
            max_force: 100.0,
            node_speed: 3000.0,
            damping: 0.9,
            steps: 300,
        }
    }
}

/// Position in layout space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

/// Force-directed layout over one graph projection
pub struct ForceLayout {
    graph: ForceGraph<NodeId, ()>,
    indices: HashMap<NodeId, DefaultNodeIdx>,
    params: LayoutParams,
}

impl ForceLayout {
    /// Seed a simulation for `graph`
    ///
    /// Nodes found in `previous` start where they were; the rest are placed
    /// on a ring around the origin.
    #[must_use]
    pub fn new(
        graph: &RepoGraph,
        params: LayoutParams,
        previous: &HashMap<NodeId, Position>,
    ) -> Self {
        let mut sim = ForceGraph::new(SimulationParameters {
            force_charge: params.charge,
            force_spring: params.spring,
            force_max: params.max_force,
            node_speed: params.node_speed,
            damping_factor: params.damping,
        });
        let mut indices = HashMap::with_capacity(graph.nodes.len());
        #[allow(clippy::cast_precision_loss)]
        let count = graph.nodes.len().max(1) as f64;

        for (i, node) in graph.nodes.iter().enumerate() {
            let seed = previous.get(&node.id).copied().unwrap_or_else(|| {
                #[allow(clippy::cast_precision_loss)]
                let angle = (i as f64) * 2.0 * PI / count;
                Position {
                    x: SEED_RADIUS * angle.cos(),
                    y: SEED_RADIUS * angle.sin(),
                }
            });

            #[allow(clippy::cast_possible_truncation)]
            let idx = sim.add_node(NodeData {
                x: seed.x as f32,
                y: seed.y as f32,
                mass: 10.0,
                is_anchor: false,
                user_data: node.id.clone(),
            });
            indices.insert(node.id.clone(), idx);
        }

        for edge in &graph.edges {
            if let (Some(&src), Some(&tgt)) =
                (indices.get(&edge.source), indices.get(&edge.target))
            {
                sim.add_edge(src, tgt, EdgeData::default());
            }
        }

        Self {
            graph: sim,
            indices,
            params,
        }
    }

    /// Advance the simulation by one tick
    pub fn tick(&mut self) {
        self.graph.update(TICK);
    }

    /// Run the configured number of ticks
    pub fn settle(&mut self) {
        for _ in 0..self.params.steps {
            self.tick();
        }
    }

    /// Pin a node where it is, or release it
    pub fn set_anchor(&mut self, id: &str, anchored: bool) {
        let Some(&idx) = self.indices.get(id) else {
            return;
        };
        self.graph.visit_nodes_mut(|node| {
            if node.index() == idx {
                node.data.is_anchor = anchored;
            }
        });
    }

    /// Number of simulated nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the simulation is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Current positions keyed by node id
    #[must_use]
    pub fn positions(&self) -> HashMap<NodeId, Position> {
        let mut out = HashMap::with_capacity(self.indices.len());
        self.graph.visit_nodes(|node| {
            out.insert(
                node.data.user_data.clone(),
                Position {
                    x: f64::from(node.x()),
                    y: f64::from(node.y()),
                },
            );
        });
        out
    }

    /// Edge endpoints as coordinate pairs
    #[must_use]
    pub fn segments(&self) -> Vec<(Position, Position)> {
        let mut out = Vec::new();
        self.graph.visit_edges(|n1, n2, _| {
            out.push((
                Position {
                    x: f64::from(n1.x()),
                    y: f64::from(n1.y()),
                },
                Position {
                    x: f64::from(n2.x()),
                    y: f64::from(n2.y()),
                },
            ));
        });
        out
    }
}

/// Axis-aligned bounds of a set of positions, padded by `margin`
#[must_use]
pub fn bounds<'a>(
    positions: impl IntoIterator<Item = &'a Position>,
    margin: f64,
) -> ([f64; 2], [f64; 2]) {
    let mut x = [f64::INFINITY, f64::NEG_INFINITY];
    let mut y = [f64::INFINITY, f64::NEG_INFINITY];
    for p in positions {
        x = [x[0].min(p.x), x[1].max(p.x)];
        y = [y[0].min(p.y), y[1].max(p.y)];
    }
    if !x[0].is_finite() {
        return ([-SEED_RADIUS, SEED_RADIUS], [-SEED_RADIUS, SEED_RADIUS]);
    }
    ([x[0] - margin, x[1] + margin], [y[0] - margin, y[1] + margin])
}
