// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{MindMap, NodeId, Position};
use crate::query::walk::{children_map, roots};

/// Horizontal/vertical distance between tree levels and sibling slots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSpacing {
    pub x: f64,
    pub y: f64,
}

impl Default for LayoutSpacing {
    fn default() -> Self {
        Self { x: 250.0, y: 100.0 }
    }
}

/// Number of leaf slots a subtree occupies: 1 for a leaf, otherwise the sum
/// over its children. Memoized per node; a node already on the recursion
/// stack contributes 0 so corrupted cyclic data terminates instead of
/// recursing forever.
fn subtree_height(
    node_id: &NodeId,
    children: &BTreeMap<NodeId, Vec<NodeId>>,
    cache: &mut BTreeMap<NodeId, usize>,
    stack: &mut BTreeSet<NodeId>,
) -> usize {
    if let Some(height) = cache.get(node_id) {
        return *height;
    }
    if !stack.insert(node_id.clone()) {
        return 0;
    }

    let height = match children.get(node_id) {
        None => 1,
        Some(kids) if kids.is_empty() => 1,
        Some(kids) => kids
            .iter()
            .map(|child| subtree_height(child, children, cache, stack))
            .sum::<usize>()
            .max(1),
    };

    stack.remove(node_id);
    cache.insert(node_id.clone(), height);
    height
}

#[allow(clippy::too_many_arguments)]
fn place(
    node_id: &NodeId,
    depth: usize,
    start_y: f64,
    spacing: LayoutSpacing,
    children: &BTreeMap<NodeId, Vec<NodeId>>,
    heights: &mut BTreeMap<NodeId, usize>,
    stack: &mut BTreeSet<NodeId>,
    positions: &mut BTreeMap<NodeId, Position>,
) {
    if positions.contains_key(node_id) {
        return;
    }

    let height = subtree_height(node_id, children, heights, stack) as f64;
    let x = depth as f64 * spacing.x;
    let y = start_y + height * spacing.y / 2.0 - spacing.y / 2.0;
    positions.insert(node_id.clone(), Position::new(x, y));

    let mut child_start_y = start_y;
    for child in children.get(node_id).into_iter().flatten() {
        place(
            child,
            depth + 1,
            child_start_y,
            spacing,
            children,
            heights,
            stack,
            positions,
        );
        child_start_y += subtree_height(child, children, heights, stack) as f64 * spacing.y;
    }
}

/// Compute a collision-free position for every node reachable from a root.
///
/// Depth sets the x coordinate; each node is centered vertically over the
/// span its subtree occupies. Multiple roots are stacked as independent
/// subtrees separated by one spacing unit. Nodes unreachable from any root
/// (possible only in corrupted data) are absent from the result and keep
/// their previous position.
pub fn layout_positions(map: &MindMap, spacing: LayoutSpacing) -> BTreeMap<NodeId, Position> {
    let children = children_map(map);
    let mut heights: BTreeMap<NodeId, usize> = BTreeMap::new();
    let mut stack: BTreeSet<NodeId> = BTreeSet::new();
    let mut positions: BTreeMap<NodeId, Position> = BTreeMap::new();

    let mut current_y = 0.0;
    for root in roots(map) {
        if positions.contains_key(&root) {
            continue;
        }
        place(
            &root,
            0,
            current_y,
            spacing,
            &children,
            &mut heights,
            &mut stack,
            &mut positions,
        );
        let height = subtree_height(&root, &children, &mut heights, &mut stack) as f64;
        current_y += height * spacing.y + spacing.y;
    }

    positions
}
