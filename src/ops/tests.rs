// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::VecDeque;
use std::sync::Mutex as StdMutex;

use tokio::sync::Mutex;

use crate::llm::{BoxFuture, ChatModel, ModelError};
use crate::model::{ChatMessage, ChatRole, NodePatch};
use crate::store::{MapStore, UNTITLED};

use super::{
    answer_selected_question, auto_title_selected, chat_and_create_node, generate_map_from_chat,
    generate_map_from_text, refine_text, send_standalone_message, suggest_child_nodes,
    summarize_branch, WorkflowError,
};

/// Plays back a fixed list of responses and records every request.
struct ScriptedModel {
    responses: StdMutex<VecDeque<Result<String, ModelError>>>,
    calls: StdMutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedModel {
    fn new(responses: impl IntoIterator<Item = Result<String, ModelError>>) -> Self {
        Self {
            responses: StdMutex::new(responses.into_iter().collect()),
            calls: StdMutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self::new([Err(ModelError::Api {
            status: 500,
            message: "boom".to_owned(),
        })])
    }

    fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl ChatModel for ScriptedModel {
    fn complete<'a>(
        &'a self,
        messages: &'a [ChatMessage],
    ) -> BoxFuture<'a, Result<String, ModelError>> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(messages.to_vec());
        let next = self
            .responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .expect("scripted response available");
        Box::pin(async move { next })
    }
}

fn store_with_selected_root() -> Mutex<MapStore> {
    let mut store = MapStore::new();
    store.add_root_node();
    Mutex::new(store)
}

const OUTLINE: &str = r##"{"nodes": [
    {"id": "g1", "title": "Theme", "color": "#4ecdc4"},
    {"id": "g2", "title": "Point"}
], "edges": [{"source": "g1", "target": "g2"}]}"##;

#[tokio::test]
async fn chat_and_create_node_builds_an_annotated_child() {
    let store = store_with_selected_root();
    let model = ScriptedModel::new([Ok("The answer.".to_owned()), Ok("Growth".to_owned())]);

    let node_id = chat_and_create_node(&store, &model, "Why grow?")
        .await
        .expect("workflow");

    let guard = store.lock().await;
    let node = guard.map().node(&node_id).expect("node");
    assert_eq!(node.data().title(), "Growth");
    assert_eq!(node.data().question(), "Why grow?");
    assert_eq!(node.data().answer(), "The answer.");
    assert!(guard.map().incoming_edge(&node_id).is_some());
    assert_eq!(guard.selected_node_id(), Some(&node_id));

    // Selecting the new node recomputed the buffer from node data.
    let roles: Vec<ChatRole> = guard.chat_history().iter().map(ChatMessage::role).collect();
    assert_eq!(roles, vec![ChatRole::User, ChatRole::Assistant]);

    // First call carried the question; the second was the title prompt.
    let calls = model.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].last().map(ChatMessage::content), Some("Why grow?"));
    assert!(calls[1][0].content().contains("short, concise title"));
}

#[tokio::test]
async fn chat_and_create_node_rolls_back_the_buffer_on_model_failure() {
    let store = store_with_selected_root();
    let model = ScriptedModel::failing();

    let (nodes_before, edges_before) = {
        let guard = store.lock().await;
        (guard.map().nodes().len(), guard.map().edges().len())
    };

    let err = chat_and_create_node(&store, &model, "Why?")
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Model(ModelError::Api { .. })));

    let guard = store.lock().await;
    assert!(guard.chat_history().is_empty());
    assert_eq!(guard.map().nodes().len(), nodes_before);
    assert_eq!(guard.map().edges().len(), edges_before);
}

#[tokio::test]
async fn chat_and_create_node_falls_back_to_a_placeholder_title() {
    let store = store_with_selected_root();
    let model = ScriptedModel::new([
        Ok("The answer.".to_owned()),
        Err(ModelError::Request {
            message: "timeout".to_owned(),
        }),
    ]);

    let node_id = chat_and_create_node(&store, &model, "Why?")
        .await
        .expect("node still created");

    let guard = store.lock().await;
    let node = guard.map().node(&node_id).expect("node");
    assert_eq!(node.data().title(), UNTITLED);
    assert_eq!(node.data().answer(), "The answer.");
}

#[tokio::test]
async fn chat_and_create_node_disambiguates_generated_titles() {
    let store = store_with_selected_root();
    {
        let mut guard = store.lock().await;
        let taken = guard.add_child_node().expect("child");
        guard.rename_node(&taken, "Growth").expect("rename");
    }
    let model = ScriptedModel::new([
        Ok("Answer.".to_owned()),
        Ok("\"Growth\"".to_owned()),
    ]);

    let node_id = chat_and_create_node(&store, &model, "Why?")
        .await
        .expect("workflow");

    let guard = store.lock().await;
    assert_eq!(
        guard.map().node(&node_id).expect("node").data().title(),
        "Growth (2)"
    );
}

#[tokio::test]
async fn chat_and_create_node_requires_a_selection() {
    let store = Mutex::new(MapStore::new());
    let model = ScriptedModel::new([]);
    let err = chat_and_create_node(&store, &model, "Why?")
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::NoSelection));
    assert!(model.calls().is_empty());
}

#[tokio::test]
async fn answer_selected_question_writes_the_answer_with_system_context() {
    let store = store_with_selected_root();
    {
        let mut guard = store.lock().await;
        guard.update_selected_node(&NodePatch {
            question: Some("What next?".to_owned()),
            ..NodePatch::default()
        });
    }
    let model = ScriptedModel::new([Ok("Do this.".to_owned())]);

    let answer = answer_selected_question(&store, &model)
        .await
        .expect("workflow");
    assert_eq!(answer, "Do this.");

    let guard = store.lock().await;
    assert_eq!(guard.selected_node().expect("node").data().answer(), "Do this.");

    let calls = model.calls();
    assert_eq!(calls[0][0].role(), ChatRole::System);
    assert_eq!(calls[0].last().map(ChatMessage::content), Some("What next?"));
}

#[tokio::test]
async fn answer_selected_question_requires_a_question() {
    let store = store_with_selected_root();
    let model = ScriptedModel::new([]);
    let err = answer_selected_question(&store, &model).await.unwrap_err();
    assert!(matches!(err, WorkflowError::QuestionRequired));
}

#[tokio::test]
async fn auto_title_rejects_duplicates_and_leaves_the_node_untouched() {
    let store = store_with_selected_root();
    {
        let mut guard = store.lock().await;
        let root = guard.selected_node_id().cloned().expect("root selected");
        let sibling = guard.add_child_node().expect("child");
        guard.rename_node(&sibling, "Taken").expect("rename");
        guard.select_node(Some(root)).expect("reselect root");
        guard.update_selected_node(&NodePatch {
            question: Some("q".to_owned()),
            answer: Some("a".to_owned()),
            ..NodePatch::default()
        });
    }
    let model = ScriptedModel::new([Ok("Taken".to_owned())]);

    let err = auto_title_selected(&store, &model).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Title(_)));

    let guard = store.lock().await;
    let titles: Vec<&str> = guard
        .map()
        .nodes()
        .iter()
        .map(|node| node.data().title())
        .collect();
    assert_eq!(titles.iter().filter(|t| **t == "Taken").count(), 1);
}

#[tokio::test]
async fn auto_title_requires_both_question_and_answer() {
    let store = store_with_selected_root();
    let model = ScriptedModel::new([]);
    let err = auto_title_selected(&store, &model).await.unwrap_err();
    assert!(matches!(err, WorkflowError::QuestionAndAnswerRequired));
}

#[tokio::test]
async fn summarize_branch_short_circuits_on_an_empty_chain() {
    let store = store_with_selected_root();
    let model = ScriptedModel::new([]);
    let err = summarize_branch(&store, &model).await.unwrap_err();
    assert!(matches!(err, WorkflowError::EmptyChat));
    assert!(model.calls().is_empty());
}

#[tokio::test]
async fn summarize_branch_appends_the_summary_prompt() {
    let store = store_with_selected_root();
    {
        let mut guard = store.lock().await;
        guard.update_selected_node(&NodePatch {
            question: Some("q".to_owned()),
            answer: Some("a".to_owned()),
            ..NodePatch::default()
        });
    }
    let model = ScriptedModel::new([Ok("- summary".to_owned())]);

    let summary = summarize_branch(&store, &model).await.expect("summary");
    assert_eq!(summary, "- summary");

    let calls = model.calls();
    assert!(calls[0]
        .last()
        .expect("final turn")
        .content()
        .contains("Summarize"));
    // Nothing changed in the store.
    assert!(store.lock().await.selected_node().expect("node").data().memo().is_empty());
}

#[tokio::test]
async fn suggest_child_nodes_splits_the_keyword_list() {
    let store = store_with_selected_root();
    let model = ScriptedModel::new([Ok("alpha, beta , ,gamma".to_owned())]);

    let created = suggest_child_nodes(&store, &model).await.expect("children");
    assert_eq!(created.len(), 3);

    let guard = store.lock().await;
    let titles: Vec<&str> = created
        .iter()
        .map(|id| guard.map().node(id).expect("node").data().title())
        .collect();
    assert_eq!(titles, vec!["alpha", "beta", "gamma"]);
}

#[tokio::test]
async fn suggest_child_nodes_rejects_an_empty_keyword_list() {
    let store = store_with_selected_root();
    let model = ScriptedModel::new([Ok("   ".to_owned())]);
    let err = suggest_child_nodes(&store, &model).await.unwrap_err();
    assert!(matches!(err, WorkflowError::EmptyGeneration));
    assert_eq!(store.lock().await.map().nodes().len(), 1);
}

#[tokio::test]
async fn refine_text_returns_the_cleaned_draft_without_mutating() {
    let store = Mutex::new(MapStore::new());
    let model = ScriptedModel::new([Ok("\"A cleaner sentence.\"".to_owned())]);

    let refined = refine_text(&store, &model, "a cleanr sentnce")
        .await
        .expect("refined");
    assert_eq!(refined, "A cleaner sentence.");
    assert!(store.lock().await.standalone_chat().is_empty());
}

#[tokio::test]
async fn send_standalone_message_appends_both_turns() {
    let store = Mutex::new(MapStore::new());
    let model = ScriptedModel::new([Ok("hello back".to_owned())]);

    let reply = send_standalone_message(&store, &model, " hello ")
        .await
        .expect("reply");
    assert_eq!(reply, "hello back");

    let guard = store.lock().await;
    let turns: Vec<(ChatRole, &str)> = guard
        .standalone_chat()
        .iter()
        .map(|m| (m.role(), m.content()))
        .collect();
    assert_eq!(
        turns,
        vec![(ChatRole::User, "hello"), (ChatRole::Assistant, "hello back")]
    );
}

#[tokio::test]
async fn send_standalone_message_rolls_back_on_failure() {
    let store = Mutex::new(MapStore::new());
    {
        let mut guard = store.lock().await;
        guard.push_standalone_message(ChatMessage::user("earlier"));
    }
    let model = ScriptedModel::failing();

    let err = send_standalone_message(&store, &model, "next")
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Model(_)));

    let guard = store.lock().await;
    assert_eq!(guard.standalone_chat().len(), 1);
    assert_eq!(guard.standalone_chat()[0].content(), "earlier");
}

#[tokio::test]
async fn generate_map_from_chat_replaces_the_map_wholesale() {
    let store = store_with_selected_root();
    {
        let mut guard = store.lock().await;
        guard.push_standalone_message(ChatMessage::user("talk about themes"));
        guard.push_standalone_message(ChatMessage::assistant("sure"));
    }
    let model = ScriptedModel::new([Ok(format!("```json\n{OUTLINE}\n```"))]);

    let count = generate_map_from_chat(&store, &model).await.expect("generate");
    assert_eq!(count, 2);

    let guard = store.lock().await;
    assert_eq!(guard.map().nodes().len(), 2);
    assert!(guard.map().nodes()[0].data().is_root());
    assert_eq!(guard.selected_node_id(), None);
    // The transcript survives generation.
    assert_eq!(guard.standalone_chat().len(), 2);

    let calls = model.calls();
    assert_eq!(calls[0][0].role(), ChatRole::System);
    assert!(calls[0][1].content().contains("user: talk about themes"));
}

#[tokio::test]
async fn generate_map_from_chat_requires_a_transcript() {
    let store = store_with_selected_root();
    let model = ScriptedModel::new([]);
    let err = generate_map_from_chat(&store, &model).await.unwrap_err();
    assert!(matches!(err, WorkflowError::EmptyChat));
}

#[tokio::test]
async fn failed_generation_leaves_the_prior_map_untouched() {
    let store = store_with_selected_root();
    {
        let mut guard = store.lock().await;
        guard.push_standalone_message(ChatMessage::user("hi"));
    }
    let before = store.lock().await.map().clone();
    let model = ScriptedModel::new([Ok("not json at all".to_owned())]);

    let err = generate_map_from_chat(&store, &model).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Outline(_)));
    assert_eq!(store.lock().await.map(), &before);
}

#[tokio::test]
async fn generate_map_from_text_uses_the_text_prompts() {
    let store = Mutex::new(MapStore::new());
    let model = ScriptedModel::new([Ok(OUTLINE.to_owned())]);

    let count = generate_map_from_text(&store, &model, "A text about themes.")
        .await
        .expect("generate");
    assert_eq!(count, 2);

    let calls = model.calls();
    assert!(calls[0][1].content().contains("Text to analyze:"));
    assert!(calls[0][1].content().contains("A text about themes."));
}

#[tokio::test]
async fn generate_map_from_text_rejects_blank_input() {
    let store = Mutex::new(MapStore::new());
    let model = ScriptedModel::new([]);
    let err = generate_map_from_text(&store, &model, "  ")
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::EmptyInput));
}
