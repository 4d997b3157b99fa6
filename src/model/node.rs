// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::ids::NodeId;

/// Default color assigned to freshly created root nodes.
pub const DEFAULT_ROOT_COLOR: &str = "#ff6b6b";

/// The structural kind of a node.
///
/// A `Root` node is a valid terminus for parent-chain walks; it carries no
/// required incoming edge. A `Normal` node must trace back to a root to be
/// structurally valid, which the connection guard enforces at edit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Root,
    Normal,
}

/// A 2D canvas position. Purely presentational; the layout engine rewrites
/// it wholesale on align.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// User-editable payload of a node.
///
/// Field names serialize in camelCase so exported documents stay readable
/// by the payload's original consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    title: String,
    color: String,
    is_root: bool,
    question: String,
    answer: String,
    memo: String,
}

impl NodeData {
    pub fn new(title: impl Into<String>, color: impl Into<String>, is_root: bool) -> Self {
        Self {
            title: title.into(),
            color: color.into(),
            is_root,
            question: String::new(),
            answer: String::new(),
            memo: String::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn set_question(&mut self, question: impl Into<String>) {
        self.question = question.into();
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn set_answer(&mut self, answer: impl Into<String>) {
        self.answer = answer.into();
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }

    pub fn set_memo(&mut self, memo: impl Into<String>) {
        self.memo = memo.into();
    }

    /// Merge a partial patch into this data. Patch fields left `None` keep
    /// their current value. No validation happens here; title uniqueness is
    /// checked at the editing boundary (`MapStore::rename_node`).
    pub fn apply(&mut self, patch: &NodePatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(question) = &patch.question {
            self.question = question.clone();
        }
        if let Some(answer) = &patch.answer {
            self.answer = answer.clone();
        }
        if let Some(memo) = &patch.memo {
            self.memo = memo.clone();
        }
    }
}

/// A partial update to a node's data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePatch {
    pub title: Option<String>,
    pub color: Option<String>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub memo: Option<String>,
}

impl NodePatch {
    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Self::default()
        }
    }

    pub fn answer(answer: impl Into<String>) -> Self {
        Self {
            answer: Some(answer.into()),
            ..Self::default()
        }
    }
}

/// A single mind-map node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapNode {
    id: NodeId,
    kind: NodeKind,
    position: Position,
    data: NodeData,
}

impl MapNode {
    pub fn new(id: NodeId, kind: NodeKind, position: Position, data: NodeData) -> Self {
        Self {
            id,
            kind,
            position,
            data,
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut NodeData {
        &mut self.data
    }
}
