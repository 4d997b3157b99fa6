// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;
use std::fmt;

use crate::model::{MindMap, NodeId};

/// Why a proposed `source -> target` connection was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// One of the endpoints does not exist in the map.
    UnknownNode { node_id: NodeId },
    /// `target` sits on `source`'s ancestor chain; committing the edge
    /// would close a cycle.
    TargetIsAncestor { source: NodeId, target: NodeId },
    /// The walk up from `source` dead-ended at a node that is not flagged
    /// as a root: an orphaned branch, refused fail-closed.
    OrphanedBranch { node_id: NodeId },
    /// The walk revisited a node: the map already contains a cycle
    /// (corrupted import failsafe).
    CycleDetected { node_id: NodeId },
}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode { node_id } => write!(f, "unknown node: {node_id}"),
            Self::TargetIsAncestor { source, target } => write!(
                f,
                "connecting {source} -> {target} would create a cycle ({target} is an ancestor of {source})"
            ),
            Self::OrphanedBranch { node_id } => {
                write!(f, "node {node_id} belongs to an orphaned non-root branch")
            }
            Self::CycleDetected { node_id } => {
                write!(f, "existing cycle detected at node {node_id}")
            }
        }
    }
}

impl std::error::Error for ConnectError {}

/// Decide whether adding or re-pointing an edge `source -> target` is
/// legal, before any mutation is committed.
///
/// Walks the parent chain upward from `source`:
/// - revisiting a node refuses (the map is already cyclic);
/// - reaching `target` refuses (the edge would close a cycle);
/// - a dead end is accepted only on a node flagged root.
///
/// Callers that receive an error must abort the connection and leave the
/// edge set untouched.
pub fn validate_connection(
    map: &MindMap,
    source: &NodeId,
    target: &NodeId,
) -> Result<(), ConnectError> {
    for node_id in [source, target] {
        if !map.contains_node(node_id) {
            return Err(ConnectError::UnknownNode {
                node_id: node_id.clone(),
            });
        }
    }

    let mut visited: BTreeSet<NodeId> = BTreeSet::new();
    let mut current = source.clone();

    loop {
        if !visited.insert(current.clone()) {
            return Err(ConnectError::CycleDetected { node_id: current });
        }

        if &current == target {
            return Err(ConnectError::TargetIsAncestor {
                source: source.clone(),
                target: target.clone(),
            });
        }

        let Some(parent_edge) = map.incoming_edge(&current) else {
            let is_root = map
                .node(&current)
                .is_some_and(|node| node.data().is_root());
            if is_root {
                return Ok(());
            }
            return Err(ConnectError::OrphanedBranch { node_id: current });
        };

        current = parent_edge.source().clone();
    }
}
