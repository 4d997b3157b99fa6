// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::{Json, Parameters};
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler, ServiceExt};
use tokio::sync::Mutex;

use crate::format::export_document;
use crate::llm::{ChatModel, ModelError};
use crate::model::{NodeId, NodePatch, Position};
use crate::ops;
use crate::ops::WorkflowError;
use crate::store::{load_map, save_map, MapStore, RecolorOutcome};

use super::types::*;

/// The command surface the UI layer drives.
///
/// Thin by design: every tool locks the store, applies one store operation
/// or workflow, and maps typed errors onto MCP error data. Validation
/// failures become `invalid_params`; model failures become
/// `internal_error`.
#[derive(Clone)]
pub struct RhizomeMcp {
    store: Arc<Mutex<MapStore>>,
    model: Arc<dyn ChatModel>,
    map_path: Option<Arc<PathBuf>>,
    tool_router: ToolRouter<Self>,
}

fn parse_node_id(raw: &str) -> Result<NodeId, ErrorData> {
    NodeId::new(raw)
        .map_err(|err| ErrorData::invalid_params(format!("invalid node_id: {err}"), None))
}

fn workflow_error_data(err: WorkflowError) -> ErrorData {
    match &err {
        WorkflowError::Model(model_err) => match model_err {
            ModelError::MissingApiKey => ErrorData::invalid_params(err.to_string(), None),
            _ => ErrorData::internal_error(err.to_string(), None),
        },
        _ => ErrorData::invalid_params(err.to_string(), None),
    }
}

#[tool_router]
impl RhizomeMcp {
    pub fn new(store: MapStore, model: Arc<dyn ChatModel>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            model,
            map_path: None,
            tool_router: Self::tool_router(),
        }
    }

    /// `map.save`/`map.load` without an explicit path use `map_path`.
    pub fn with_map_path(store: MapStore, model: Arc<dyn ChatModel>, map_path: PathBuf) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            model,
            map_path: Some(Arc::new(map_path)),
            tool_router: Self::tool_router(),
        }
    }

    pub async fn serve_stdio(self) -> Result<(), rmcp::RmcpError> {
        let service = self.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
        service.waiting().await?;
        Ok(())
    }

    fn resolve_path(&self, explicit: Option<String>) -> Result<PathBuf, ErrorData> {
        if let Some(path) = explicit {
            return Ok(PathBuf::from(path));
        }
        self.map_path
            .as_deref()
            .cloned()
            .ok_or_else(|| {
                ErrorData::invalid_params(
                    "no path given and the server was started without a map file",
                    None,
                )
            })
    }

    /// Full graph snapshot: nodes, edges, selection, and revision.
    #[tool(name = "map.state")]
    async fn map_state(&self) -> Result<Json<MapStateResponse>, ErrorData> {
        let guard = self.store.lock().await;
        Ok(Json(MapStateResponse {
            nodes: guard.map().nodes().iter().map(McpNode::from_model).collect(),
            edges: guard.map().edges().iter().map(McpEdge::from_model).collect(),
            selected_node_id: guard
                .selected_node_id()
                .map(|id| id.as_str().to_owned()),
            rev: guard.rev(),
        }))
    }

    /// Create a root node and select it.
    #[tool(name = "node.add_root")]
    async fn node_add_root(&self) -> Result<Json<AddNodeResponse>, ErrorData> {
        let mut guard = self.store.lock().await;
        let node_id = guard.add_root_node();
        let title = guard
            .map()
            .node(&node_id)
            .map(|node| node.data().title().to_owned())
            .unwrap_or_default();
        Ok(Json(AddNodeResponse {
            node_id: node_id.into_string(),
            title,
            rev: guard.rev(),
        }))
    }

    /// Create a child under the selected node and select it.
    #[tool(name = "node.add_child")]
    async fn node_add_child(&self) -> Result<Json<AddNodeResponse>, ErrorData> {
        let mut guard = self.store.lock().await;
        let Some(node_id) = guard.add_child_node() else {
            return Err(ErrorData::invalid_params("select a parent node first", None));
        };
        let title = guard
            .map()
            .node(&node_id)
            .map(|node| node.data().title().to_owned())
            .unwrap_or_default();
        Ok(Json(AddNodeResponse {
            node_id: node_id.into_string(),
            title,
            rev: guard.rev(),
        }))
    }

    /// Create one child per title under the selected node.
    #[tool(name = "node.add_children")]
    async fn node_add_children(
        &self,
        params: Parameters<AddChildrenParams>,
    ) -> Result<Json<AddChildrenResponse>, ErrorData> {
        let AddChildrenParams { titles } = params.0;
        if titles.iter().all(|title| title.trim().is_empty()) {
            return Err(ErrorData::invalid_params("titles must not be empty", None));
        }

        let mut guard = self.store.lock().await;
        let created = guard.add_child_nodes(&titles);
        if created.is_empty() {
            return Err(ErrorData::invalid_params("select a parent node first", None));
        }
        Ok(Json(AddChildrenResponse {
            node_ids: created.into_iter().map(NodeId::into_string).collect(),
            rev: guard.rev(),
        }))
    }

    /// Cascading delete of the selected node and its whole subtree.
    #[tool(name = "node.delete_selected")]
    async fn node_delete_selected(&self) -> Result<Json<DeleteSelectedResponse>, ErrorData> {
        let mut guard = self.store.lock().await;
        let Some(removed) = guard.delete_selected_node() else {
            return Err(ErrorData::invalid_params("nothing is selected", None));
        };
        Ok(Json(DeleteSelectedResponse {
            removed_nodes: removed as u64,
            rev: guard.rev(),
        }))
    }

    /// Select a node (recomputes the chat context) or clear the selection.
    #[tool(name = "node.select")]
    async fn node_select(
        &self,
        params: Parameters<SelectParams>,
    ) -> Result<Json<RevResponse>, ErrorData> {
        let node_id = params.0.node_id.as_deref().map(parse_node_id).transpose()?;

        let mut guard = self.store.lock().await;
        guard
            .select_node(node_id)
            .map_err(|err| ErrorData::invalid_params(err.to_string(), None))?;
        Ok(Json(RevResponse { rev: guard.rev() }))
    }

    /// Merge a partial data patch. With `node_id` the patch applies as an
    /// inline edit; without it, to the selected node, where a color change
    /// also restyles incoming edges. Titles go through `node.rename`.
    #[tool(name = "node.update")]
    async fn node_update(
        &self,
        params: Parameters<NodeUpdateParams>,
    ) -> Result<Json<RevResponse>, ErrorData> {
        let NodeUpdateParams {
            node_id,
            color,
            question,
            answer,
            memo,
        } = params.0;
        let patch = NodePatch {
            title: None,
            color,
            question,
            answer,
            memo,
        };

        let mut guard = self.store.lock().await;
        let applied = match node_id.as_deref() {
            Some(raw) => {
                let node_id = parse_node_id(raw)?;
                guard.update_node_data(&node_id, &patch)
            }
            None => guard.update_selected_node(&patch),
        };
        if !applied {
            return Err(ErrorData::invalid_params(
                "no such node (or nothing selected)",
                None,
            ));
        }
        Ok(Json(RevResponse { rev: guard.rev() }))
    }

    /// Rename with validation: empty titles and duplicates are refused and
    /// the prior title kept.
    #[tool(name = "node.rename")]
    async fn node_rename(
        &self,
        params: Parameters<NodeRenameParams>,
    ) -> Result<Json<RevResponse>, ErrorData> {
        let NodeRenameParams { node_id, title } = params.0;
        let node_id = parse_node_id(&node_id)?;

        let mut guard = self.store.lock().await;
        guard
            .rename_node(&node_id, &title)
            .map_err(|err| ErrorData::invalid_params(err.to_string(), None))?;
        Ok(Json(RevResponse { rev: guard.rev() }))
    }

    /// Push the selected node's color down its whole subtree.
    #[tool(name = "node.recolor_descendants")]
    async fn node_recolor_descendants(
        &self,
    ) -> Result<Json<RecolorDescendantsResponse>, ErrorData> {
        let mut guard = self.store.lock().await;
        match guard.apply_color_to_descendants() {
            RecolorOutcome::NoSelection => {
                Err(ErrorData::invalid_params("nothing is selected", None))
            }
            RecolorOutcome::NoDescendants => Ok(Json(RecolorDescendantsResponse {
                outcome: "no_descendants".to_owned(),
                nodes: 0,
                rev: guard.rev(),
            })),
            RecolorOutcome::Applied { nodes } => Ok(Json(RecolorDescendantsResponse {
                outcome: "applied".to_owned(),
                nodes: nodes as u64,
                rev: guard.rev(),
            })),
        }
    }

    /// Reposition one node (drag deltas from the rendering layer).
    #[tool(name = "node.move")]
    async fn node_move(
        &self,
        params: Parameters<NodeMoveParams>,
    ) -> Result<Json<RevResponse>, ErrorData> {
        let NodeMoveParams { node_id, x, y } = params.0;
        let node_id = parse_node_id(&node_id)?;

        let mut guard = self.store.lock().await;
        if !guard.set_node_position(&node_id, Position::new(x, y)) {
            return Err(ErrorData::invalid_params("no such node", None));
        }
        Ok(Json(RevResponse { rev: guard.rev() }))
    }

    /// Connect source → target. Refused connections (cycles, orphaned
    /// branches) leave the edge set untouched; an accepted one replaces
    /// the target's previous parent edge.
    #[tool(name = "edge.connect")]
    async fn edge_connect(
        &self,
        params: Parameters<ConnectParams>,
    ) -> Result<Json<RevResponse>, ErrorData> {
        let ConnectParams { source, target } = params.0;
        let source = parse_node_id(&source)?;
        let target = parse_node_id(&target)?;

        let mut guard = self.store.lock().await;
        guard
            .connect(&source, &target)
            .map_err(|err| ErrorData::invalid_params(err.to_string(), None))?;
        Ok(Json(RevResponse { rev: guard.rev() }))
    }

    /// Recompute every node position from the tree layout.
    #[tool(name = "map.align")]
    async fn map_align(&self) -> Result<Json<AlignResponse>, ErrorData> {
        let mut guard = self.store.lock().await;
        let changed = guard.align();
        Ok(Json(AlignResponse {
            changed,
            rev: guard.rev(),
        }))
    }

    /// Render the export document without touching the filesystem.
    #[tool(name = "map.export")]
    async fn map_export(&self) -> Result<Json<ExportResponse>, ErrorData> {
        let guard = self.store.lock().await;
        let document = export_document(guard.map())
            .map_err(|err| ErrorData::internal_error(err.to_string(), None))?;
        Ok(Json(ExportResponse { document }))
    }

    /// Write the export document to disk (atomic replace).
    #[tool(name = "map.save")]
    async fn map_save(
        &self,
        params: Parameters<SaveParams>,
    ) -> Result<Json<SaveResponse>, ErrorData> {
        let path = self.resolve_path(params.0.path)?;
        let guard = self.store.lock().await;
        save_map(&path, guard.map())
            .map_err(|err| ErrorData::internal_error(err.to_string(), None))?;
        Ok(Json(SaveResponse {
            path: path.display().to_string(),
        }))
    }

    /// Replace the whole map from a document on disk. Destructive, so it
    /// refuses to run unless `confirm` is true; failures of any kind leave
    /// the current map untouched.
    #[tool(name = "map.load")]
    async fn map_load(
        &self,
        params: Parameters<LoadParams>,
    ) -> Result<Json<LoadResponse>, ErrorData> {
        let LoadParams { path, confirm } = params.0;
        if confirm != Some(true) {
            return Err(ErrorData::invalid_params(
                "loading replaces the whole map and clears the selection; pass confirm=true to proceed",
                None,
            ));
        }
        let path = self.resolve_path(path)?;

        let map =
            load_map(&path).map_err(|err| ErrorData::invalid_params(err.to_string(), None))?;

        let mut guard = self.store.lock().await;
        let nodes = map.nodes().len() as u64;
        let edges = map.edges().len() as u64;
        guard.replace_map(map);
        Ok(Json(LoadResponse {
            nodes,
            edges,
            rev: guard.rev(),
        }))
    }

    /// The node-chat buffer (the selected node's conversation).
    #[tool(name = "chat.history")]
    async fn chat_history(&self) -> Result<Json<ChatHistoryResponse>, ErrorData> {
        let guard = self.store.lock().await;
        Ok(Json(ChatHistoryResponse {
            messages: guard
                .chat_history()
                .iter()
                .map(McpChatMessage::from_model)
                .collect(),
            selected_node_id: guard
                .selected_node_id()
                .map(|id| id.as_str().to_owned()),
        }))
    }

    /// Ask a question in the selected node's context and grow an annotated
    /// child from the answer.
    #[tool(name = "chat.send")]
    async fn chat_send(
        &self,
        params: Parameters<ChatSendParams>,
    ) -> Result<Json<ChatSendResponse>, ErrorData> {
        let node_id = ops::chat_and_create_node(&self.store, &*self.model, &params.0.question)
            .await
            .map_err(workflow_error_data)?;

        let guard = self.store.lock().await;
        let (title, answer) = guard
            .map()
            .node(&node_id)
            .map(|node| {
                (
                    node.data().title().to_owned(),
                    node.data().answer().to_owned(),
                )
            })
            .unwrap_or_default();
        Ok(Json(ChatSendResponse {
            node_id: node_id.into_string(),
            title,
            answer,
            rev: guard.rev(),
        }))
    }

    /// Answer the selected node's question into its answer field.
    #[tool(name = "chat.answer")]
    async fn chat_answer(&self) -> Result<Json<AnswerResponse>, ErrorData> {
        let answer = ops::answer_selected_question(&self.store, &*self.model)
            .await
            .map_err(workflow_error_data)?;
        let guard = self.store.lock().await;
        Ok(Json(AnswerResponse {
            answer,
            rev: guard.rev(),
        }))
    }

    /// Generate a title for the selected node from its question/answer.
    #[tool(name = "chat.auto_title")]
    async fn chat_auto_title(&self) -> Result<Json<AutoTitleResponse>, ErrorData> {
        let title = ops::auto_title_selected(&self.store, &*self.model)
            .await
            .map_err(workflow_error_data)?;
        let guard = self.store.lock().await;
        Ok(Json(AutoTitleResponse {
            title,
            rev: guard.rev(),
        }))
    }

    /// Suggest related keywords and add them as children of the selection.
    #[tool(name = "chat.suggest_children")]
    async fn chat_suggest_children(&self) -> Result<Json<AddChildrenResponse>, ErrorData> {
        let created = ops::suggest_child_nodes(&self.store, &*self.model)
            .await
            .map_err(workflow_error_data)?;
        let guard = self.store.lock().await;
        Ok(Json(AddChildrenResponse {
            node_ids: created.into_iter().map(NodeId::into_string).collect(),
            rev: guard.rev(),
        }))
    }

    /// Summarize the conversation along the selected node's branch.
    #[tool(name = "chat.summarize_branch")]
    async fn chat_summarize_branch(&self) -> Result<Json<SummaryResponse>, ErrorData> {
        let summary = ops::summarize_branch(&self.store, &*self.model)
            .await
            .map_err(workflow_error_data)?;
        Ok(Json(SummaryResponse { summary }))
    }

    /// Clean up a draft message against the standalone conversation.
    #[tool(name = "chat.refine")]
    async fn chat_refine(
        &self,
        params: Parameters<RefineParams>,
    ) -> Result<Json<RefineResponse>, ErrorData> {
        let text = ops::refine_text(&self.store, &*self.model, &params.0.text)
            .await
            .map_err(workflow_error_data)?;
        Ok(Json(RefineResponse { text }))
    }

    /// The standalone (map-independent) conversation.
    #[tool(name = "standalone.history")]
    async fn standalone_history(&self) -> Result<Json<StandaloneHistoryResponse>, ErrorData> {
        let guard = self.store.lock().await;
        Ok(Json(StandaloneHistoryResponse {
            messages: guard
                .standalone_chat()
                .iter()
                .map(McpChatMessage::from_model)
                .collect(),
        }))
    }

    /// One turn of standalone conversation.
    #[tool(name = "standalone.send")]
    async fn standalone_send(
        &self,
        params: Parameters<StandaloneSendParams>,
    ) -> Result<Json<StandaloneSendResponse>, ErrorData> {
        let reply = ops::send_standalone_message(&self.store, &*self.model, &params.0.text)
            .await
            .map_err(workflow_error_data)?;
        Ok(Json(StandaloneSendResponse { reply }))
    }

    /// Clear the standalone conversation buffer.
    #[tool(name = "standalone.clear")]
    async fn standalone_clear(&self) -> Result<Json<RevResponse>, ErrorData> {
        let mut guard = self.store.lock().await;
        guard.clear_standalone_chat();
        Ok(Json(RevResponse { rev: guard.rev() }))
    }

    /// Convert the standalone conversation into a fresh map (replaces the
    /// current one).
    #[tool(name = "standalone.generate_map")]
    async fn standalone_generate_map(&self) -> Result<Json<GenerateMapResponse>, ErrorData> {
        let nodes = ops::generate_map_from_chat(&self.store, &*self.model)
            .await
            .map_err(workflow_error_data)?;
        let guard = self.store.lock().await;
        Ok(Json(GenerateMapResponse {
            nodes: nodes as u64,
            rev: guard.rev(),
        }))
    }

    /// Convert arbitrary text into a fresh map (replaces the current one).
    #[tool(name = "map.generate_from_text")]
    async fn map_generate_from_text(
        &self,
        params: Parameters<GenerateFromTextParams>,
    ) -> Result<Json<GenerateMapResponse>, ErrorData> {
        let nodes = ops::generate_map_from_text(&self.store, &*self.model, &params.0.text)
            .await
            .map_err(workflow_error_data)?;
        let guard = self.store.lock().await;
        Ok(Json(GenerateMapResponse {
            nodes: nodes as u64,
            rev: guard.rev(),
        }))
    }
}

#[tool_handler]
impl ServerHandler for RhizomeMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Rhizome mind-map server (tools: map.state, map.align, map.export, map.save, map.load, map.generate_from_text, node.add_root, node.add_child, node.add_children, node.delete_selected, node.select, node.update, node.rename, node.recolor_descendants, node.move, edge.connect, chat.history, chat.send, chat.answer, chat.auto_title, chat.suggest_children, chat.summarize_branch, chat.refine, standalone.history, standalone.send, standalone.clear, standalone.generate_map)"
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
