// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

// Not every bench target uses every fixture.
#![allow(dead_code)]

use rhizome::model::{MapEdge, MapNode, MindMap, NodeData, NodeId, NodeKind, Position};

fn nid(value: String) -> NodeId {
    NodeId::new(value).expect("node id")
}

/// A balanced tree with `fanout^depth`-ish nodes under one root.
pub fn balanced_map(fanout: usize, depth: usize) -> MindMap {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();

    let root = nid("n0".to_owned());
    nodes.push(MapNode::new(
        root.clone(),
        NodeKind::Root,
        Position::default(),
        NodeData::new("Root", "#ff6b6b", true),
    ));

    let mut frontier = vec![root];
    let mut next_index = 1usize;
    for _ in 0..depth {
        let mut next_frontier = Vec::new();
        for parent in &frontier {
            for _ in 0..fanout {
                let id = nid(format!("n{next_index}"));
                nodes.push(MapNode::new(
                    id.clone(),
                    NodeKind::Normal,
                    Position::default(),
                    NodeData::new(format!("Node {next_index}"), "#4ecdc4", false),
                ));
                edges.push(MapEdge::new(parent.clone(), id.clone(), "#4ecdc4"));
                next_frontier.push(id);
                next_index += 1;
            }
        }
        frontier = next_frontier;
    }

    MindMap::new(nodes, edges)
}

/// A single parent chain of `len` nodes.
pub fn chain_map(len: usize) -> MindMap {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();

    for index in 0..len {
        let id = nid(format!("n{index}"));
        let is_root = index == 0;
        let kind = if is_root { NodeKind::Root } else { NodeKind::Normal };
        nodes.push(MapNode::new(
            id.clone(),
            kind,
            Position::default(),
            NodeData::new(format!("Node {index}"), "#ffe66d", is_root),
        ));
        if index > 0 {
            edges.push(MapEdge::new(
                nid(format!("n{}", index - 1)),
                id,
                "#ffe66d",
            ));
        }
    }

    MindMap::new(nodes, edges)
}
