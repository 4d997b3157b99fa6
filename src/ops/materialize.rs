// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Turning a generated outline into a laid-out map.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::layout::{layout_positions, LayoutSpacing};
use crate::llm::MapOutline;
use crate::model::{MapEdge, MapNode, MindMap, NodeData, NodeId, NodeKind};

/// Colors cycled over root branches when the outline does not assign one.
pub const BRANCH_PALETTE: [&str; 5] =
    ["#ff6b6b", "#4ecdc4", "#ffe66d", "#a8e6cf", "#ff8b94"];

/// Build a `MindMap` from a validated outline.
///
/// - The single-parent invariant is enforced by keeping only the first
///   edge per target (self-loops are dropped outright).
/// - Outline nodes without an incoming edge become roots.
/// - Missing colors resolve to the parent's color, or to the palette for
///   roots.
/// - Titles are disambiguated in node order with the usual `" (N)"` rule.
/// - Positions come from the tree layout, so the generated map arrives
///   already aligned.
pub fn materialize_outline(outline: &MapOutline) -> MindMap {
    let mut parent: BTreeMap<&str, &str> = BTreeMap::new();
    let mut children: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    let mut kept_edges: Vec<(&str, &str)> = Vec::new();
    for edge in &outline.edges {
        if edge.source == edge.target || parent.contains_key(edge.target.as_str()) {
            continue;
        }
        parent.insert(&edge.target, &edge.source);
        children
            .entry(edge.source.as_str())
            .or_default()
            .push(&edge.target);
        kept_edges.push((&edge.source, &edge.target));
    }

    let provided: BTreeMap<&str, &str> = outline
        .nodes
        .iter()
        .filter_map(|node| {
            node.color
                .as_deref()
                .map(|color| (node.id.as_str(), color))
        })
        .collect();

    // Resolve colors top-down from the roots.
    let mut colors: BTreeMap<&str, String> = BTreeMap::new();
    let mut root_index = 0usize;
    for node in &outline.nodes {
        if parent.contains_key(node.id.as_str()) {
            continue;
        }
        let root_color = provided
            .get(node.id.as_str())
            .map(|color| (*color).to_owned())
            .unwrap_or_else(|| BRANCH_PALETTE[root_index % BRANCH_PALETTE.len()].to_owned());
        root_index += 1;

        let mut queue: VecDeque<&str> = VecDeque::new();
        colors.insert(node.id.as_str(), root_color);
        queue.push_back(node.id.as_str());
        while let Some(current) = queue.pop_front() {
            let current_color = colors[current].clone();
            for child in children.get(current).into_iter().flatten() {
                if colors.contains_key(*child) {
                    continue;
                }
                let color = provided
                    .get(*child)
                    .map(|color| (*color).to_owned())
                    .unwrap_or(current_color.clone());
                colors.insert(child, color);
                queue.push_back(child);
            }
        }
    }

    let mut titles: BTreeSet<String> = BTreeSet::new();
    let mut nodes = Vec::with_capacity(outline.nodes.len());
    for node in &outline.nodes {
        let id = NodeId::new(node.id.clone()).expect("outline ids validated by parse_outline");
        let is_root = !parent.contains_key(node.id.as_str());
        let kind = if is_root { NodeKind::Root } else { NodeKind::Normal };
        let color = colors
            .get(node.id.as_str())
            .cloned()
            .unwrap_or_else(|| BRANCH_PALETTE[0].to_owned());

        let base = node.title.trim();
        let mut title = base.to_owned();
        let mut counter = 2u64;
        while titles.contains(&title) {
            title = format!("{base} ({counter})");
            counter += 1;
        }
        titles.insert(title.clone());

        nodes.push(MapNode::new(
            id,
            kind,
            Default::default(),
            NodeData::new(title, color, is_root),
        ));
    }

    let edges = kept_edges
        .into_iter()
        .map(|(source, target)| {
            let stroke = colors
                .get(target)
                .cloned()
                .unwrap_or_else(|| BRANCH_PALETTE[0].to_owned());
            MapEdge::new(
                NodeId::new(source).expect("outline ids validated by parse_outline"),
                NodeId::new(target).expect("outline ids validated by parse_outline"),
                stroke,
            )
        })
        .collect();

    let mut map = MindMap::new(nodes, edges);
    let positions = layout_positions(&map, LayoutSpacing::default());
    for node in map.nodes_mut() {
        if let Some(position) = positions.get(node.id()) {
            node.set_position(*position);
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::materialize_outline;
    use crate::llm::parse_outline;
    use crate::model::{NodeId, NodeKind};

    fn nid(value: &str) -> NodeId {
        NodeId::new(value).expect("node id")
    }

    #[test]
    fn parentless_nodes_become_roots_and_children_inherit_colors() {
        let outline = parse_outline(
            r##"{"nodes": [
                {"id": "a", "title": "Theme", "color": "#123456"},
                {"id": "b", "title": "Branch"},
                {"id": "c", "title": "Leaf"}
            ], "edges": [
                {"source": "a", "target": "b"},
                {"source": "b", "target": "c"}
            ]}"##,
        )
        .expect("outline");

        let map = materialize_outline(&outline);
        let root = map.node(&nid("a")).expect("root");
        assert_eq!(root.kind(), NodeKind::Root);
        assert!(root.data().is_root());
        assert_eq!(root.data().color(), "#123456");

        let leaf = map.node(&nid("c")).expect("leaf");
        assert_eq!(leaf.kind(), NodeKind::Normal);
        assert_eq!(leaf.data().color(), "#123456");

        let edge = map.incoming_edge(&nid("c")).expect("edge");
        assert_eq!(edge.stroke_color(), "#123456");
    }

    #[test]
    fn uncolored_roots_cycle_the_palette() {
        let outline = parse_outline(
            r#"{"nodes": [
                {"id": "a", "title": "One"},
                {"id": "b", "title": "Two"}
            ], "edges": []}"#,
        )
        .expect("outline");

        let map = materialize_outline(&outline);
        assert_eq!(map.node(&nid("a")).expect("a").data().color(), "#ff6b6b");
        assert_eq!(map.node(&nid("b")).expect("b").data().color(), "#4ecdc4");
    }

    #[test]
    fn duplicate_titles_are_disambiguated_and_extra_parents_dropped() {
        let outline = parse_outline(
            r#"{"nodes": [
                {"id": "a", "title": "Topic"},
                {"id": "b", "title": "Topic"},
                {"id": "c", "title": "Topic"}
            ], "edges": [
                {"source": "a", "target": "c"},
                {"source": "b", "target": "c"}
            ]}"#,
        )
        .expect("outline");

        let map = materialize_outline(&outline);
        let titles: Vec<&str> = map.nodes().iter().map(|n| n.data().title()).collect();
        assert_eq!(titles, vec!["Topic", "Topic (2)", "Topic (3)"]);

        // Only the first edge into `c` survives.
        assert_eq!(map.edges().len(), 1);
        assert_eq!(map.edges()[0].source(), &nid("a"));
    }

    #[test]
    fn generated_maps_arrive_laid_out_by_depth() {
        let outline = parse_outline(
            r#"{"nodes": [
                {"id": "a", "title": "Root"},
                {"id": "b", "title": "Mid"},
                {"id": "c", "title": "Deep"}
            ], "edges": [
                {"source": "a", "target": "b"},
                {"source": "b", "target": "c"}
            ]}"#,
        )
        .expect("outline");

        let map = materialize_outline(&outline);
        assert_eq!(map.node(&nid("a")).expect("a").position().x, 0.0);
        assert_eq!(map.node(&nid("b")).expect("b").position().x, 250.0);
        assert_eq!(map.node(&nid("c")).expect("c").position().x, 500.0);
    }
}
