// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The authoritative map state and its primitive mutations.
//!
//! `MapStore` owns the node/edge collections, the selection, and the two
//! transient chat buffers. Every mutation happens synchronously under
//! `&mut self`; composite asynchronous workflows live in `ops` and call
//! back into these primitives between model calls.

use std::fmt;

use crate::layout::{layout_positions, LayoutSpacing};
use crate::model::{
    ChatMessage, MapEdge, MapNode, MindMap, NodeData, NodeId, NodeKind, NodePatch, Position,
    DEFAULT_ROOT_COLOR,
};
use crate::query::{chat_context, descendants, validate_connection, ConnectError};

pub mod map_file;

pub use map_file::{load_map, save_map, MapFileError};

/// Base title for new root nodes, disambiguated with `" (N)"` suffixes.
pub const ROOT_TITLE: &str = "Root Node";
/// Base title for new child nodes.
pub const CHILD_TITLE: &str = "New Node";
/// Placeholder when automatic title generation fails or comes back empty.
pub const UNTITLED: &str = "Untitled";

const ROOT_POSITION: Position = Position { x: 400.0, y: 100.0 };

/// Outcome of [`MapStore::apply_color_to_descendants`].
///
/// Having no descendants is an ordinary no-op, reported distinctly so the
/// surface can phrase it as information rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecolorOutcome {
    NoSelection,
    NoDescendants,
    Applied { nodes: usize },
}

/// Title validation failures at the editing boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleError {
    Empty,
    Duplicate { title: String },
    UnknownNode { node_id: NodeId },
}

impl fmt::Display for TitleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("title must not be empty"),
            Self::Duplicate { title } => write!(f, "title {title:?} already exists"),
            Self::UnknownNode { node_id } => write!(f, "unknown node: {node_id}"),
        }
    }
}

impl std::error::Error for TitleError {}

/// Selecting or attaching against a node that is not in the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownNodeError {
    pub node_id: NodeId,
}

impl fmt::Display for UnknownNodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown node: {}", self.node_id)
    }
}

impl std::error::Error for UnknownNodeError {}

/// Single-writer, synchronous aggregate of map + selection + chat buffers.
///
/// Mutations replace collections wholesale, so each operation is trivially
/// all-or-nothing. A monotonic revision counter is bumped on every
/// successful mutation for surfaces that want cheap change detection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapStore {
    map: MindMap,
    selected_node_id: Option<NodeId>,
    chat_history: Vec<ChatMessage>,
    standalone_chat: Vec<ChatMessage>,
    rev: u64,
    next_node_index: u64,
}

impl MapStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_map(map: MindMap) -> Self {
        Self {
            map,
            ..Self::default()
        }
    }

    pub fn map(&self) -> &MindMap {
        &self.map
    }

    pub fn selected_node_id(&self) -> Option<&NodeId> {
        self.selected_node_id.as_ref()
    }

    pub fn selected_node(&self) -> Option<&MapNode> {
        self.selected_node_id
            .as_ref()
            .and_then(|id| self.map.node(id))
    }

    pub fn chat_history(&self) -> &[ChatMessage] {
        &self.chat_history
    }

    pub fn standalone_chat(&self) -> &[ChatMessage] {
        &self.standalone_chat
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    fn bump_rev(&mut self) {
        self.rev = self.rev.saturating_add(1);
    }

    /// Allocate the next `n<index>` id not already present (imported maps
    /// may carry ids of any shape, including ones matching the scheme).
    fn next_node_id(&mut self) -> NodeId {
        loop {
            self.next_node_index += 1;
            let candidate =
                NodeId::new(format!("n{}", self.next_node_index)).expect("generated id is valid");
            if !self.map.contains_node(&candidate) {
                return candidate;
            }
        }
    }

    /// Disambiguate `base` against every existing title: the trimmed base
    /// itself if free, otherwise `"<base> (N)"` with N counting up from 2.
    pub fn unique_title(&self, base: &str) -> String {
        unique_title_among(&self.map, base)
    }

    /// `add_root_node` — a new root at the fixed spawn position, selected.
    pub fn add_root_node(&mut self) -> NodeId {
        let title = self.unique_title(ROOT_TITLE);
        let id = self.next_node_id();
        let node = MapNode::new(
            id.clone(),
            NodeKind::Root,
            ROOT_POSITION,
            NodeData::new(title, DEFAULT_ROOT_COLOR, true),
        );
        self.map.nodes_mut().push(node);
        self.select_internal(Some(id.clone()));
        self.bump_rev();
        id
    }

    /// `add_child_node` — a child below the selection, inheriting its
    /// color, connected and selected. Silently does nothing without a
    /// selection.
    pub fn add_child_node(&mut self) -> Option<NodeId> {
        let parent_id = self.selected_node_id.clone()?;
        let parent = self.map.node(&parent_id)?;
        let parent_position = parent.position();
        let color = parent.data().color().to_owned();

        let title = self.unique_title(CHILD_TITLE);
        let id = self.next_node_id();
        let position = Position::new(parent_position.x, parent_position.y + 100.0);
        let node = MapNode::new(
            id.clone(),
            NodeKind::Normal,
            position,
            NodeData::new(title, color.clone(), false),
        );
        self.map.nodes_mut().push(node);
        self.map
            .edges_mut()
            .push(MapEdge::new(parent_id, id.clone(), color));
        self.select_internal(Some(id.clone()));
        self.bump_rev();
        Some(id)
    }

    /// `add_multiple_child_nodes` — one sibling per title, staggered
    /// vertically under the selection. Returns the created ids (empty
    /// without a selection). Selection does not move.
    pub fn add_child_nodes(&mut self, titles: &[String]) -> Vec<NodeId> {
        let Some(parent_id) = self.selected_node_id.clone() else {
            return Vec::new();
        };
        let Some(parent) = self.map.node(&parent_id) else {
            return Vec::new();
        };
        let parent_position = parent.position();
        let color = parent.data().color().to_owned();

        let mut created = Vec::new();
        for (index, title) in titles.iter().enumerate() {
            let title = self.unique_title(title.trim());
            let id = self.next_node_id();
            let position = Position::new(
                parent_position.x + 50.0,
                parent_position.y + 100.0 + index as f64 * 80.0,
            );
            let node = MapNode::new(
                id.clone(),
                NodeKind::Normal,
                position,
                NodeData::new(title, color.clone(), false),
            );
            self.map.nodes_mut().push(node);
            self.map
                .edges_mut()
                .push(MapEdge::new(parent_id.clone(), id.clone(), color.clone()));
            created.push(id);
        }

        if !created.is_empty() {
            self.bump_rev();
        }
        created
    }

    /// Attach an annotated child to an explicit parent. Used by the
    /// chat workflow, whose parent was captured before a model call and may
    /// have been deleted while the call was in flight.
    pub fn attach_child(
        &mut self,
        parent_id: &NodeId,
        title: impl Into<String>,
        offset: Position,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Result<NodeId, UnknownNodeError> {
        let Some(parent) = self.map.node(parent_id) else {
            return Err(UnknownNodeError {
                node_id: parent_id.clone(),
            });
        };
        let parent_position = parent.position();
        let color = parent.data().color().to_owned();

        let title = self.unique_title(&title.into());
        let id = self.next_node_id();
        let mut data = NodeData::new(title, color.clone(), false);
        data.set_question(question);
        data.set_answer(answer);
        let node = MapNode::new(
            id.clone(),
            NodeKind::Normal,
            Position::new(parent_position.x + offset.x, parent_position.y + offset.y),
            data,
        );
        self.map.nodes_mut().push(node);
        self.map
            .edges_mut()
            .push(MapEdge::new(parent_id.clone(), id.clone(), color));
        self.bump_rev();
        Ok(id)
    }

    /// `delete_selected_node` — cascading delete of the selection and its
    /// whole descendant subtree plus every touching edge. Returns the
    /// number of removed nodes, or `None` without a selection.
    pub fn delete_selected_node(&mut self) -> Option<usize> {
        let selected = self.selected_node_id.clone()?;

        let mut doomed = descendants(&self.map, &selected);
        doomed.insert(selected);

        let removed = self
            .map
            .nodes()
            .iter()
            .filter(|node| doomed.contains(node.id()))
            .count();

        self.map
            .nodes_mut()
            .retain(|node| !doomed.contains(node.id()));
        self.map
            .edges_mut()
            .retain(|edge| !doomed.contains(edge.source()) && !doomed.contains(edge.target()));
        self.select_internal(None);
        self.bump_rev();
        Some(removed)
    }

    /// `update_selected_node` — merge a patch into the selection; a color
    /// change also restyles every edge pointing at the selection. Returns
    /// false without a selection.
    pub fn update_selected_node(&mut self, patch: &NodePatch) -> bool {
        let Some(selected) = self.selected_node_id.clone() else {
            return false;
        };
        let Some(node) = self.map.node_mut(&selected) else {
            return false;
        };
        node.data_mut().apply(patch);

        if let Some(color) = &patch.color {
            for edge in self.map.edges_mut() {
                if edge.target() == &selected {
                    edge.set_stroke_color(color.clone());
                }
            }
        }
        self.bump_rev();
        true
    }

    /// `update_node_data` — the same merge addressed by explicit id, with
    /// no edge restyle (used for inline edits).
    pub fn update_node_data(&mut self, node_id: &NodeId, patch: &NodePatch) -> bool {
        let Some(node) = self.map.node_mut(node_id) else {
            return false;
        };
        node.data_mut().apply(patch);
        self.bump_rev();
        true
    }

    /// The editing boundary for titles: trims, refuses empty titles and
    /// titles already used by any other node, and leaves the prior value
    /// untouched on refusal.
    pub fn rename_node(&mut self, node_id: &NodeId, title: &str) -> Result<(), TitleError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TitleError::Empty);
        }
        if !self.map.contains_node(node_id) {
            return Err(TitleError::UnknownNode {
                node_id: node_id.clone(),
            });
        }
        if self.map.title_taken_by_other(title, node_id) {
            return Err(TitleError::Duplicate {
                title: title.to_owned(),
            });
        }

        let node = self.map.node_mut(node_id).expect("existence checked above");
        if node.data().title() != title {
            node.data_mut().set_title(title);
            self.bump_rev();
        }
        Ok(())
    }

    /// `apply_color_to_descendants` — recolor every strict descendant node
    /// and every edge pointing at one to the selection's current color.
    pub fn apply_color_to_descendants(&mut self) -> RecolorOutcome {
        let Some(selected) = self.selected_node_id.clone() else {
            return RecolorOutcome::NoSelection;
        };
        let Some(node) = self.map.node(&selected) else {
            return RecolorOutcome::NoSelection;
        };
        let color = node.data().color().to_owned();

        let below = descendants(&self.map, &selected);
        if below.is_empty() {
            return RecolorOutcome::NoDescendants;
        }

        for node in self.map.nodes_mut() {
            if below.contains(node.id()) {
                node.data_mut().set_color(color.clone());
            }
        }
        for edge in self.map.edges_mut() {
            if below.contains(edge.target()) {
                edge.set_stroke_color(color.clone());
            }
        }
        self.bump_rev();
        RecolorOutcome::Applied { nodes: below.len() }
    }

    /// `set_selected_node_id` — selecting recomputes the node-chat buffer
    /// from the ancestor chain (current node included); deselecting clears
    /// both selection and buffer.
    pub fn select_node(&mut self, node_id: Option<NodeId>) -> Result<(), UnknownNodeError> {
        if let Some(id) = &node_id {
            if !self.map.contains_node(id) {
                return Err(UnknownNodeError {
                    node_id: id.clone(),
                });
            }
        }
        self.select_internal(node_id);
        self.bump_rev();
        Ok(())
    }

    fn select_internal(&mut self, node_id: Option<NodeId>) {
        match node_id {
            Some(id) => {
                self.chat_history = chat_context(&self.map, &id, true);
                self.selected_node_id = Some(id);
            }
            None => {
                self.selected_node_id = None;
                self.chat_history.clear();
            }
        }
    }

    /// `connect` — validate with the cycle guard, then re-point: any
    /// existing edge into `target` is removed before the new edge (stroked
    /// with the target's color) is added. Rejection leaves the edge set
    /// untouched.
    pub fn connect(&mut self, source: &NodeId, target: &NodeId) -> Result<(), ConnectError> {
        validate_connection(&self.map, source, target)?;

        let stroke = self
            .map
            .node(target)
            .map(|node| node.data().color().to_owned())
            .expect("guard verified the target exists");

        self.map.edges_mut().retain(|edge| edge.target() != target);
        self.map
            .edges_mut()
            .push(MapEdge::new(source.clone(), target.clone(), stroke));
        self.bump_rev();
        Ok(())
    }

    /// Reposition a single node (drag deltas arrive from the rendering
    /// collaborator). Returns false for unknown ids.
    pub fn set_node_position(&mut self, node_id: &NodeId, position: Position) -> bool {
        let Some(node) = self.map.node_mut(node_id) else {
            return false;
        };
        node.set_position(position);
        self.bump_rev();
        true
    }

    /// `align` — rewrite every reachable node's position from the tree
    /// layout. A map with fewer than two nodes is left alone.
    pub fn align(&mut self) -> bool {
        if self.map.nodes().len() < 2 {
            return false;
        }
        let positions = layout_positions(&self.map, LayoutSpacing::default());
        for node in self.map.nodes_mut() {
            if let Some(position) = positions.get(node.id()) {
                node.set_position(*position);
            }
        }
        self.bump_rev();
        true
    }

    /// Wholesale state replacement (file load, generated maps). Clears
    /// selection and the node-chat buffer; the standalone buffer survives,
    /// since generation reads from it.
    pub fn replace_map(&mut self, map: MindMap) {
        self.map = map;
        self.select_internal(None);
        self.next_node_index = 0;
        self.bump_rev();
    }

    // Chat buffer primitives for the async workflows: snapshots are taken
    // before optimistic appends and restored verbatim on failure.

    pub fn push_chat_message(&mut self, message: ChatMessage) {
        self.chat_history.push(message);
        self.bump_rev();
    }

    pub fn chat_snapshot(&self) -> Vec<ChatMessage> {
        self.chat_history.clone()
    }

    pub fn restore_chat(&mut self, snapshot: Vec<ChatMessage>) {
        self.chat_history = snapshot;
        self.bump_rev();
    }

    pub fn push_standalone_message(&mut self, message: ChatMessage) {
        self.standalone_chat.push(message);
        self.bump_rev();
    }

    pub fn standalone_snapshot(&self) -> Vec<ChatMessage> {
        self.standalone_chat.clone()
    }

    pub fn restore_standalone(&mut self, snapshot: Vec<ChatMessage>) {
        self.standalone_chat = snapshot;
        self.bump_rev();
    }

    pub fn clear_standalone_chat(&mut self) {
        if !self.standalone_chat.is_empty() {
            self.standalone_chat.clear();
            self.bump_rev();
        }
    }
}

/// Shared title disambiguation: the trimmed base itself when free,
/// otherwise `"<stem> (N)"` counting up from 2, where the stem is the base
/// minus any disambiguator it already carries.
pub fn unique_title_among(map: &MindMap, base: &str) -> String {
    let base = base.trim();
    let titles = map.titles();
    if !titles.contains(base) {
        return base.to_owned();
    }
    let stem = strip_disambiguator(base);
    let mut counter = 2u64;
    loop {
        let candidate = format!("{stem} ({counter})");
        if !titles.contains(candidate.as_str()) {
            return candidate;
        }
        counter += 1;
    }
}

/// Drop a trailing `" (N)"` disambiguator so re-disambiguation does not
/// stack suffixes (`"Title (2) (3)"`).
pub fn strip_disambiguator(title: &str) -> &str {
    let Some(open) = title.rfind(" (") else {
        return title;
    };
    let inner = &title[open + 2..];
    let Some(digits) = inner.strip_suffix(')') else {
        return title;
    };
    if !digits.is_empty() && digits.chars().all(|ch| ch.is_ascii_digit()) {
        &title[..open]
    } else {
        title
    }
}
