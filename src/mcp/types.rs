// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{ChatMessage, ChatRole, MapEdge, MapNode, NodeKind};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpPosition {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpNode {
    pub node_id: String,
    pub kind: String,
    pub position: McpPosition,
    pub title: String,
    pub color: String,
    pub is_root: bool,
    pub question: String,
    pub answer: String,
    pub memo: String,
}

impl McpNode {
    pub fn from_model(node: &MapNode) -> Self {
        Self {
            node_id: node.id().as_str().to_owned(),
            kind: match node.kind() {
                NodeKind::Root => "root".to_owned(),
                NodeKind::Normal => "normal".to_owned(),
            },
            position: McpPosition {
                x: node.position().x,
                y: node.position().y,
            },
            title: node.data().title().to_owned(),
            color: node.data().color().to_owned(),
            is_root: node.data().is_root(),
            question: node.data().question().to_owned(),
            answer: node.data().answer().to_owned(),
            memo: node.data().memo().to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpEdge {
    pub edge_id: String,
    pub source: String,
    pub target: String,
    pub stroke_color: String,
}

impl McpEdge {
    pub fn from_model(edge: &MapEdge) -> Self {
        Self {
            edge_id: edge.id().as_str().to_owned(),
            source: edge.source().as_str().to_owned(),
            target: edge.target().as_str().to_owned(),
            stroke_color: edge.stroke_color().to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpChatMessage {
    pub role: String,
    pub content: String,
}

impl McpChatMessage {
    pub fn from_model(message: &ChatMessage) -> Self {
        Self {
            role: match message.role() {
                ChatRole::System => "system".to_owned(),
                ChatRole::User => "user".to_owned(),
                ChatRole::Assistant => "assistant".to_owned(),
            },
            content: message.content().to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MapStateResponse {
    pub nodes: Vec<McpNode>,
    pub edges: Vec<McpEdge>,
    pub selected_node_id: Option<String>,
    pub rev: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RevResponse {
    pub rev: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AddNodeResponse {
    pub node_id: String,
    pub title: String,
    pub rev: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddChildrenParams {
    pub titles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AddChildrenResponse {
    pub node_ids: Vec<String>,
    pub rev: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DeleteSelectedResponse {
    pub removed_nodes: u64,
    pub rev: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SelectParams {
    /// Omit to clear the selection.
    pub node_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct NodeUpdateParams {
    /// Omit to address the selected node; a color change on the selected
    /// node also restyles its incoming edges.
    pub node_id: Option<String>,
    pub color: Option<String>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct NodeRenameParams {
    pub node_id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RecolorDescendantsResponse {
    /// "applied" or "no_descendants".
    pub outcome: String,
    pub nodes: u64,
    pub rev: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct NodeMoveParams {
    pub node_id: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ConnectParams {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AlignResponse {
    pub changed: bool,
    pub rev: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExportResponse {
    pub document: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SaveParams {
    /// Defaults to the map file the server was started with.
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SaveResponse {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LoadParams {
    /// Defaults to the map file the server was started with.
    pub path: Option<String>,
    /// Loading replaces the whole map; must be `true` to proceed.
    pub confirm: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LoadResponse {
    pub nodes: u64,
    pub edges: u64,
    pub rev: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChatHistoryResponse {
    pub messages: Vec<McpChatMessage>,
    pub selected_node_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ChatSendParams {
    pub question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChatSendResponse {
    pub node_id: String,
    pub title: String,
    pub answer: String,
    pub rev: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnswerResponse {
    pub answer: String,
    pub rev: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AutoTitleResponse {
    pub title: String,
    pub rev: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RefineParams {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RefineResponse {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StandaloneHistoryResponse {
    pub messages: Vec<McpChatMessage>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct StandaloneSendParams {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StandaloneSendResponse {
    pub reply: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GenerateMapResponse {
    pub nodes: u64,
    pub rev: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GenerateFromTextParams {
    pub text: String,
}
