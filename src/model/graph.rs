// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::edge::MapEdge;
use super::ids::NodeId;
use super::node::MapNode;

/// The full graph state: every node and every edge, in insertion order.
///
/// Insertion order is semantic — sibling order in the layout engine and in
/// the exported preview follows edge order. Identity is matched by id;
/// mutations go through `MapStore`, which replaces collections wholesale.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MindMap {
    nodes: Vec<MapNode>,
    edges: Vec<MapEdge>,
}

impl MindMap {
    pub fn new(nodes: Vec<MapNode>, edges: Vec<MapEdge>) -> Self {
        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[MapNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[MapEdge] {
        &self.edges
    }

    pub fn nodes_mut(&mut self) -> &mut Vec<MapNode> {
        &mut self.nodes
    }

    pub fn edges_mut(&mut self) -> &mut Vec<MapEdge> {
        &mut self.edges
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&MapNode> {
        self.nodes.iter().find(|node| node.id() == node_id)
    }

    pub fn node_mut(&mut self, node_id: &NodeId) -> Option<&mut MapNode> {
        self.nodes.iter_mut().find(|node| node.id() == node_id)
    }

    pub fn contains_node(&self, node_id: &NodeId) -> bool {
        self.node(node_id).is_some()
    }

    /// The edge pointing at `target`, if any. At most one exists by the
    /// single-parent invariant; a corrupted import may carry more, in which
    /// case the first in edge order wins (matching the walk order used by
    /// the queries).
    pub fn incoming_edge(&self, target: &NodeId) -> Option<&MapEdge> {
        self.edges.iter().find(|edge| edge.target() == target)
    }

    pub fn titles(&self) -> BTreeSet<&str> {
        self.nodes.iter().map(|node| node.data().title()).collect()
    }

    pub fn title_taken_by_other(&self, title: &str, node_id: &NodeId) -> bool {
        self.nodes
            .iter()
            .any(|node| node.id() != node_id && node.data().title() == title)
    }
}
