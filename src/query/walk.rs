// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Structural walks over the edge-implied forest.
//!
//! All walks are bounded by visited sets: imported data may be corrupted
//! into cycles, and a walk must fail closed (stop) rather than hang.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::model::{MindMap, NodeId};

/// `target -> source` parent lookup built from the edge list, O(E).
///
/// In a valid map each target appears at most once; if a corrupted import
/// carries several incoming edges, the first in edge order wins, matching
/// `MindMap::incoming_edge`.
pub fn parent_map(map: &MindMap) -> BTreeMap<NodeId, NodeId> {
    let mut parents: BTreeMap<NodeId, NodeId> = BTreeMap::new();
    for edge in map.edges() {
        parents
            .entry(edge.target().clone())
            .or_insert_with(|| edge.source().clone());
    }
    parents
}

/// `source -> [targets]` children lookup, preserving edge order so sibling
/// order stays stable in layout and preview output.
pub fn children_map(map: &MindMap) -> BTreeMap<NodeId, Vec<NodeId>> {
    let mut children: BTreeMap<NodeId, Vec<NodeId>> = BTreeMap::new();
    for edge in map.edges() {
        children
            .entry(edge.source().clone())
            .or_default()
            .push(edge.target().clone());
    }
    children
}

/// Nodes with no incoming edge, in node order.
pub fn roots(map: &MindMap) -> Vec<NodeId> {
    let parents = parent_map(map);
    map.nodes()
        .iter()
        .filter(|node| !parents.contains_key(node.id()))
        .map(|node| node.id().clone())
        .collect()
}

/// The chain from the topmost ancestor down to `node_id`, in root-to-node
/// order. Only ids of nodes that actually exist in the map appear on the
/// path. With `include_current = false` the final (starting) node is
/// dropped. A revisited id ends the walk as if no parent were found.
pub fn ancestor_path(map: &MindMap, node_id: &NodeId, include_current: bool) -> Vec<NodeId> {
    let parents = parent_map(map);

    let mut path = Vec::new();
    let mut visited: BTreeSet<NodeId> = BTreeSet::new();
    let mut current = Some(node_id.clone());

    while let Some(id) = current {
        if !visited.insert(id.clone()) {
            break;
        }
        if map.contains_node(&id) {
            path.push(id.clone());
        }
        current = parents.get(&id).cloned();
    }

    path.reverse();

    if !include_current {
        path.pop();
    }

    path
}

/// Every node strictly below `node_id`, following outgoing edges
/// transitively. The starting node itself is excluded.
pub fn descendants(map: &MindMap, node_id: &NodeId) -> BTreeSet<NodeId> {
    let children = children_map(map);

    let mut collected: BTreeSet<NodeId> = BTreeSet::new();
    let mut visited: BTreeSet<NodeId> = BTreeSet::new();
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    queue.push_back(node_id.clone());

    while let Some(current) = queue.pop_front() {
        if !visited.insert(current.clone()) {
            continue;
        }
        if &current != node_id {
            collected.insert(current.clone());
        }
        for child in children.get(&current).into_iter().flatten() {
            if !visited.contains(child) {
                queue.push_back(child.clone());
            }
        }
    }

    collected
}
