// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Composite asynchronous workflows.
//!
//! Each workflow is a pipeline of synchronous store mutations and model
//! calls. The store lock is held only around mutations, never across an
//! await on the model, so other operations may interleave with an
//! in-flight call. Optimistic buffer appends are rolled back from
//! snapshots when the call they anticipated fails.

use std::fmt;

use tokio::sync::Mutex;

use crate::llm::{parse_outline, ChatModel, ModelError, OutlineError};
use crate::llm::prompts::{
    association_prompt, refine_prompt, render_transcript, title_prompt,
    CHAT_RESPONSE_SYSTEM_PROMPT, MINDMAP_GENERATION_INSTRUCTION,
    MINDMAP_GENERATION_SYSTEM_PROMPT, SUMMARIZE_PROMPT, TEXT_TO_MINDMAP_INSTRUCTION,
    TEXT_TO_MINDMAP_SYSTEM_PROMPT,
};
use crate::model::{ChatMessage, NodeId, NodePatch, Position};
use crate::query::chat_context;
use crate::store::{MapStore, TitleError, UNTITLED};

pub mod materialize;

pub use materialize::{materialize_outline, BRANCH_PALETTE};

#[cfg(test)]
mod tests;

#[derive(Debug)]
pub enum WorkflowError {
    /// The operation needs a selected node and none is selected.
    NoSelection,
    /// The selected node has no question to answer.
    QuestionRequired,
    /// Title generation needs both a question and an answer on the node.
    QuestionAndAnswerRequired,
    /// The conversation to operate on is empty.
    EmptyChat,
    /// The caller passed blank input.
    EmptyInput,
    /// The model answered, but with nothing usable (blank title, empty
    /// keyword list).
    EmptyGeneration,
    /// A node captured before a model call disappeared while the call was
    /// in flight.
    VanishedNode { node_id: NodeId },
    Model(ModelError),
    Outline(OutlineError),
    Title(TitleError),
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSelection => f.write_str("select a node first"),
            Self::QuestionRequired => f.write_str("the selected node has no question"),
            Self::QuestionAndAnswerRequired => {
                f.write_str("both question and answer must be filled")
            }
            Self::EmptyChat => f.write_str("there is no conversation to work with"),
            Self::EmptyInput => f.write_str("input text must not be empty"),
            Self::EmptyGeneration => f.write_str("the model produced no usable output"),
            Self::VanishedNode { node_id } => {
                write!(f, "node {node_id} was removed while the request was in flight")
            }
            Self::Model(err) => err.fmt(f),
            Self::Outline(err) => err.fmt(f),
            Self::Title(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for WorkflowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Model(err) => Some(err),
            Self::Outline(err) => Some(err),
            Self::Title(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelError> for WorkflowError {
    fn from(err: ModelError) -> Self {
        Self::Model(err)
    }
}

impl From<OutlineError> for WorkflowError {
    fn from(err: OutlineError) -> Self {
        Self::Outline(err)
    }
}

/// Trim a one-line model answer and drop one pair of surrounding quotes.
fn normalize_generated_line(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('"').unwrap_or(trimmed);
    trimmed.trim().to_owned()
}

/// Ask the model the question in the context of the selected node's
/// ancestor chain, then create an annotated child node carrying the
/// question/answer pair.
///
/// The user turn is appended to the chat buffer optimistically; a failed
/// answer call restores the buffer snapshot and creates nothing. The
/// follow-up title call is independent: its failure (or a blank result)
/// degrades to the `Untitled` placeholder rather than blocking creation.
pub async fn chat_and_create_node(
    store: &Mutex<MapStore>,
    model: &dyn ChatModel,
    question: &str,
) -> Result<NodeId, WorkflowError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(WorkflowError::EmptyInput);
    }

    let (parent_id, snapshot, messages) = {
        let mut guard = store.lock().await;
        let parent_id = guard
            .selected_node_id()
            .cloned()
            .ok_or(WorkflowError::NoSelection)?;
        let snapshot = guard.chat_snapshot();
        let mut messages = chat_context(guard.map(), &parent_id, true);
        let user_message = ChatMessage::user(question);
        messages.push(user_message.clone());
        guard.push_chat_message(user_message);
        (parent_id, snapshot, messages)
    };

    let answer = match model.complete(&messages).await {
        Ok(answer) => answer,
        Err(err) => {
            store.lock().await.restore_chat(snapshot);
            return Err(err.into());
        }
    };

    store
        .lock()
        .await
        .push_chat_message(ChatMessage::assistant(&answer));

    let title_request = [ChatMessage::user(title_prompt(question, &answer))];
    let title = match model.complete(&title_request).await {
        Ok(raw) => {
            let cleaned = normalize_generated_line(&raw);
            if cleaned.is_empty() {
                UNTITLED.to_owned()
            } else {
                cleaned
            }
        }
        Err(_) => UNTITLED.to_owned(),
    };

    let mut guard = store.lock().await;
    let node_id = guard
        .attach_child(&parent_id, title, Position::new(0.0, 120.0), question, &answer)
        .map_err(|err| WorkflowError::VanishedNode {
            node_id: err.node_id,
        })?;
    guard
        .select_node(Some(node_id.clone()))
        .expect("node attached in this critical section");
    Ok(node_id)
}

/// Answer the selected node's own question into its `answer` field, using
/// the ancestor chain (excluding the node itself) as context.
pub async fn answer_selected_question(
    store: &Mutex<MapStore>,
    model: &dyn ChatModel,
) -> Result<String, WorkflowError> {
    let (node_id, messages) = {
        let guard = store.lock().await;
        let node = guard.selected_node().ok_or(WorkflowError::NoSelection)?;
        let question = node.data().question().trim().to_owned();
        if question.is_empty() {
            return Err(WorkflowError::QuestionRequired);
        }
        let node_id = node.id().clone();
        let mut messages = vec![ChatMessage::system(CHAT_RESPONSE_SYSTEM_PROMPT)];
        messages.extend(chat_context(guard.map(), &node_id, false));
        messages.push(ChatMessage::user(question));
        (node_id, messages)
    };

    let answer = model.complete(&messages).await?;

    let mut guard = store.lock().await;
    if !guard.update_node_data(&node_id, &NodePatch::answer(answer.clone())) {
        return Err(WorkflowError::VanishedNode { node_id });
    }
    Ok(answer)
}

/// Generate a short title from the selected node's question/answer pair.
/// Unlike the soft fallback inside [`chat_and_create_node`], an unusable
/// or duplicate result here is surfaced and the node left untouched.
pub async fn auto_title_selected(
    store: &Mutex<MapStore>,
    model: &dyn ChatModel,
) -> Result<String, WorkflowError> {
    let (node_id, question, answer) = {
        let guard = store.lock().await;
        let node = guard.selected_node().ok_or(WorkflowError::NoSelection)?;
        let question = node.data().question().trim().to_owned();
        let answer = node.data().answer().trim().to_owned();
        if question.is_empty() || answer.is_empty() {
            return Err(WorkflowError::QuestionAndAnswerRequired);
        }
        (node.id().clone(), question, answer)
    };

    let raw = model
        .complete(&[ChatMessage::user(title_prompt(&question, &answer))])
        .await?;
    let title = normalize_generated_line(&raw);
    if title.is_empty() {
        return Err(WorkflowError::EmptyGeneration);
    }

    store
        .lock()
        .await
        .rename_node(&node_id, &title)
        .map_err(WorkflowError::Title)?;
    Ok(title)
}

/// Summarize the conversation along the selected node's ancestor chain.
/// Pure read: nothing in the store changes. An empty chain short-circuits
/// without a model call.
pub async fn summarize_branch(
    store: &Mutex<MapStore>,
    model: &dyn ChatModel,
) -> Result<String, WorkflowError> {
    let messages = {
        let guard = store.lock().await;
        let node_id = guard
            .selected_node_id()
            .cloned()
            .ok_or(WorkflowError::NoSelection)?;
        let mut messages = chat_context(guard.map(), &node_id, true);
        if messages.is_empty() {
            return Err(WorkflowError::EmptyChat);
        }
        messages.push(ChatMessage::user(SUMMARIZE_PROMPT));
        messages
    };

    Ok(model.complete(&messages).await?)
}

/// Ask for associated keywords and materialize them as child nodes under
/// the selection.
pub async fn suggest_child_nodes(
    store: &Mutex<MapStore>,
    model: &dyn ChatModel,
) -> Result<Vec<NodeId>, WorkflowError> {
    let prompt = {
        let guard = store.lock().await;
        let node = guard.selected_node().ok_or(WorkflowError::NoSelection)?;
        let context = chat_context(guard.map(), node.id(), true);
        association_prompt(node.data().title(), &context)
    };

    let raw = model.complete(&[ChatMessage::user(prompt)]).await?;
    let titles: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    if titles.is_empty() {
        return Err(WorkflowError::EmptyGeneration);
    }

    let created = store.lock().await.add_child_nodes(&titles);
    if created.is_empty() {
        return Err(WorkflowError::NoSelection);
    }
    Ok(created)
}

/// Clean up a draft message against the standalone conversation. Pure
/// read; the caller decides what to do with the refined text.
pub async fn refine_text(
    store: &Mutex<MapStore>,
    model: &dyn ChatModel,
    draft: &str,
) -> Result<String, WorkflowError> {
    if draft.trim().is_empty() {
        return Err(WorkflowError::EmptyInput);
    }

    let context = store.lock().await.standalone_snapshot();
    let raw = model
        .complete(&[ChatMessage::user(refine_prompt(&context, draft))])
        .await?;
    let refined = normalize_generated_line(&raw);
    if refined.is_empty() {
        return Err(WorkflowError::EmptyGeneration);
    }
    Ok(refined)
}

/// One turn of the standalone (map-independent) conversation, with the
/// optimistic user turn rolled back if the model fails.
pub async fn send_standalone_message(
    store: &Mutex<MapStore>,
    model: &dyn ChatModel,
    text: &str,
) -> Result<String, WorkflowError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(WorkflowError::EmptyInput);
    }

    let (snapshot, messages) = {
        let mut guard = store.lock().await;
        let snapshot = guard.standalone_snapshot();
        guard.push_standalone_message(ChatMessage::user(text));
        (snapshot, guard.standalone_chat().to_vec())
    };

    match model.complete(&messages).await {
        Ok(reply) => {
            store
                .lock()
                .await
                .push_standalone_message(ChatMessage::assistant(&reply));
            Ok(reply)
        }
        Err(err) => {
            store.lock().await.restore_standalone(snapshot);
            Err(err.into())
        }
    }
}

/// Convert the standalone conversation into a fresh mind map, replacing
/// the current one. Any failure — model, parse, shape check — leaves the
/// prior map untouched.
pub async fn generate_map_from_chat(
    store: &Mutex<MapStore>,
    model: &dyn ChatModel,
) -> Result<usize, WorkflowError> {
    let transcript = store.lock().await.standalone_snapshot();
    if transcript.is_empty() {
        return Err(WorkflowError::EmptyChat);
    }

    let messages = vec![
        ChatMessage::system(MINDMAP_GENERATION_SYSTEM_PROMPT),
        ChatMessage::user(format!(
            "{MINDMAP_GENERATION_INSTRUCTION}\n\nConversation:\n{}",
            render_transcript(&transcript)
        )),
    ];

    replace_with_generated(store, model, messages).await
}

/// Convert arbitrary text into a fresh mind map, replacing the current
/// one. Same failure policy as [`generate_map_from_chat`].
pub async fn generate_map_from_text(
    store: &Mutex<MapStore>,
    model: &dyn ChatModel,
    text: &str,
) -> Result<usize, WorkflowError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(WorkflowError::EmptyInput);
    }

    let messages = vec![
        ChatMessage::system(TEXT_TO_MINDMAP_SYSTEM_PROMPT),
        ChatMessage::user(format!("{TEXT_TO_MINDMAP_INSTRUCTION}\n{text}")),
    ];

    replace_with_generated(store, model, messages).await
}

async fn replace_with_generated(
    store: &Mutex<MapStore>,
    model: &dyn ChatModel,
    messages: Vec<ChatMessage>,
) -> Result<usize, WorkflowError> {
    let raw = model.complete(&messages).await?;
    let outline = parse_outline(&raw)?;
    let map = materialize_outline(&outline);
    let count = map.nodes().len();
    store.lock().await.replace_map(map);
    Ok(count)
}
