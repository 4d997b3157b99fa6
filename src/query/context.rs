// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{ChatMessage, MindMap, NodeId};

use super::walk::ancestor_path;

/// The conversation leading to `node_id`: for every node on the
/// root-to-node chain, a non-blank question becomes a `user` turn and a
/// non-blank answer an `assistant` turn. Blank fields emit nothing, so the
/// result alternates only as far as the underlying data does.
pub fn chat_context(map: &MindMap, node_id: &NodeId, include_current: bool) -> Vec<ChatMessage> {
    let mut context = Vec::new();

    for id in ancestor_path(map, node_id, include_current) {
        let Some(node) = map.node(&id) else {
            continue;
        };
        let question = node.data().question();
        if !question.trim().is_empty() {
            context.push(ChatMessage::user(question));
        }
        let answer = node.data().answer();
        if !answer.trim().is_empty() {
            context.push(ChatMessage::assistant(answer));
        }
    }

    context
}

#[cfg(test)]
mod tests {
    use super::chat_context;
    use crate::model::{
        ChatRole, MapEdge, MapNode, MindMap, NodeData, NodeId, NodeKind, Position,
    };

    fn nid(value: &str) -> NodeId {
        NodeId::new(value).expect("node id")
    }

    fn qa_node(id: &str, question: &str, answer: &str) -> MapNode {
        let mut data = NodeData::new(id.to_uppercase(), "#ff6b6b", false);
        data.set_question(question);
        data.set_answer(answer);
        MapNode::new(nid(id), NodeKind::Normal, Position::default(), data)
    }

    fn chain() -> MindMap {
        MindMap::new(
            vec![
                qa_node("root", "q1", "a1"),
                qa_node("mid", "q2", "a2"),
                qa_node("leaf", "q3", "a3"),
            ],
            vec![
                MapEdge::new(nid("root"), nid("mid"), "#ff6b6b"),
                MapEdge::new(nid("mid"), nid("leaf"), "#ff6b6b"),
            ],
        )
    }

    fn turns(messages: &[crate::model::ChatMessage]) -> Vec<(ChatRole, String)> {
        messages
            .iter()
            .map(|m| (m.role(), m.content().to_owned()))
            .collect()
    }

    #[test]
    fn three_level_chain_yields_six_alternating_turns() {
        let map = chain();
        let context = chat_context(&map, &nid("leaf"), true);
        assert_eq!(
            turns(&context),
            vec![
                (ChatRole::User, "q1".to_owned()),
                (ChatRole::Assistant, "a1".to_owned()),
                (ChatRole::User, "q2".to_owned()),
                (ChatRole::Assistant, "a2".to_owned()),
                (ChatRole::User, "q3".to_owned()),
                (ChatRole::Assistant, "a3".to_owned()),
            ]
        );
    }

    #[test]
    fn excluding_the_current_node_drops_its_turns() {
        let map = chain();
        let context = chat_context(&map, &nid("leaf"), false);
        assert_eq!(context.len(), 4);
        assert_eq!(context.last().map(|m| m.content()), Some("a2"));
    }

    #[test]
    fn blank_questions_and_answers_emit_no_turns() {
        let map = MindMap::new(
            vec![
                qa_node("root", "q1", "  "),
                qa_node("leaf", "", "a2"),
            ],
            vec![MapEdge::new(nid("root"), nid("leaf"), "#ff6b6b")],
        );

        let context = chat_context(&map, &nid("leaf"), true);
        assert_eq!(
            turns(&context),
            vec![
                (ChatRole::User, "q1".to_owned()),
                (ChatRole::Assistant, "a2".to_owned()),
            ]
        );
    }
}
