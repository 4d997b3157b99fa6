// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::edge::MapEdge;
use super::graph::MindMap;
use super::ids::NodeId;
use super::node::{MapNode, NodeData, NodeKind, Position};

fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

fn node(id: &str, kind: NodeKind, title: &str, color: &str) -> MapNode {
    MapNode::new(
        nid(id),
        kind,
        Position::default(),
        NodeData::new(title, color, matches!(kind, NodeKind::Root)),
    )
}

/// A small demo map: one root with two branches, one of them annotated with
/// a question/answer pair. Used by `--demo` and as a test fixture.
pub fn demo_map() -> MindMap {
    let mut planning = node("n1", NodeKind::Root, "Trip Planning", "#ff6b6b");
    planning.set_position(Position::new(400.0, 100.0));

    let mut transport = node("n2", NodeKind::Normal, "Transport", "#4ecdc4");
    transport.set_position(Position::new(250.0, 250.0));
    transport
        .data_mut()
        .set_question("What is the cheapest way to get there?");
    transport
        .data_mut()
        .set_answer("Overnight bus, if you book two weeks ahead.");

    let mut lodging = node("n3", NodeKind::Normal, "Lodging", "#ffe66d");
    lodging.set_position(Position::new(550.0, 250.0));
    lodging.data_mut().set_memo("Hostel vs. guesthouse, undecided.");

    let mut booking = node("n4", NodeKind::Normal, "Booking", "#4ecdc4");
    booking.set_position(Position::new(250.0, 400.0));

    MindMap::new(
        vec![planning, transport, lodging, booking],
        vec![
            MapEdge::new(nid("n1"), nid("n2"), "#4ecdc4"),
            MapEdge::new(nid("n1"), nid("n3"), "#ffe66d"),
            MapEdge::new(nid("n2"), nid("n4"), "#4ecdc4"),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::demo_map;

    #[test]
    fn demo_map_is_a_single_parent_forest() {
        let map = demo_map();
        assert_eq!(map.nodes().len(), 4);
        assert_eq!(map.edges().len(), 3);

        for node in map.nodes() {
            let incoming = map
                .edges()
                .iter()
                .filter(|edge| edge.target() == node.id())
                .count();
            assert!(incoming <= 1, "node {} has {incoming} parents", node.id());
        }
    }
}
