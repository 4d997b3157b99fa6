// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::ids::{edge_id_for, EdgeId, NodeId};

/// A directed parent→child edge.
///
/// The store keeps at most one edge per target node (single-parent forest);
/// `MapStore::connect` removes any previous incoming edge before inserting
/// a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapEdge {
    id: EdgeId,
    source: NodeId,
    target: NodeId,
    stroke_color: String,
}

impl MapEdge {
    /// Build an edge with the id derived from its endpoints.
    pub fn new(source: NodeId, target: NodeId, stroke_color: impl Into<String>) -> Self {
        let id = edge_id_for(&source, &target);
        Self {
            id,
            source,
            target,
            stroke_color: stroke_color.into(),
        }
    }

    pub fn id(&self) -> &EdgeId {
        &self.id
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }

    pub fn stroke_color(&self) -> &str {
        &self.stroke_color
    }

    pub fn set_stroke_color(&mut self, stroke_color: impl Into<String>) {
        self.stroke_color = stroke_color.into();
    }
}

#[cfg(test)]
mod tests {
    use super::MapEdge;
    use crate::model::NodeId;

    #[test]
    fn edge_derives_its_id_and_serializes_stroke_color() {
        let edge = MapEdge::new(
            NodeId::new("a").expect("source"),
            NodeId::new("b").expect("target"),
            "#4ecdc4",
        );

        assert_eq!(edge.id().as_str(), "e-a-b");
        let value = serde_json::to_value(&edge).expect("serialize");
        assert_eq!(value["strokeColor"], "#4ecdc4");
        assert_eq!(value["source"], "a");
        assert_eq!(value["target"], "b");
    }
}
