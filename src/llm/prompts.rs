// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Prompt catalog.
//!
//! Every prompt the engine sends lives here, so wording changes never
//! touch workflow code.

use crate::model::{ChatMessage, ChatRole};

/// System prompt for in-map question answering.
pub const CHAT_RESPONSE_SYSTEM_PROMPT: &str =
    "Follow the flow of the conversation context and reply with the best \
     answer in roughly one hundred words.";

/// Final user turn for branch summaries.
pub const SUMMARIZE_PROMPT: &str =
    "Summarize the key points of this conversation in Markdown format.";

/// System prompt for converting a chat transcript into a mind map.
pub const MINDMAP_GENERATION_SYSTEM_PROMPT: &str =
    "You are an assistant that converts a chat conversation into a mind map \
     structure. You MUST return ONLY valid JSON. Do not include any \
     explanation, markdown formatting, or additional text before or after \
     the JSON.";

/// Instruction for chat-to-mind-map generation.
pub const MINDMAP_GENERATION_INSTRUCTION: &str = r##"Convert the following conversation into a concise mind map.

Return the response as valid JSON ONLY, in this exact schema:
{"nodes": [{"id": "string", "title": "string", "color": "#RRGGBB"}], "edges": [{"source": "string", "target": "string"}]}

Rules:
- ids must be unique and referenced by edges
- Include 1-3 root topics with reasonable hierarchy depth
- Titles should be short and meaningful
- Include color codes in hex format (e.g., #ff6b6b)
- Return ONLY the JSON object, nothing else"##;

/// System prompt for converting arbitrary text into a mind map.
pub const TEXT_TO_MINDMAP_SYSTEM_PROMPT: &str =
    "You are an assistant that analyzes text and converts it into a mind \
     map structure. You MUST return ONLY valid JSON. Do not include any \
     explanation, markdown formatting, or additional text before or after \
     the JSON.";

/// Instruction for text-to-mind-map generation; the text to analyze is
/// appended after this block.
pub const TEXT_TO_MINDMAP_INSTRUCTION: &str = r##"Analyze the following text and convert it into a mind map structure.

Return the response as valid JSON ONLY, in this exact schema:
{"nodes": [{"id": "string", "title": "string", "color": "#RRGGBB"}], "edges": [{"source": "string", "target": "string"}]}

Rules:
- Extract main topics and their relationships from the text
- ids must be unique and referenced by edges
- Create 1-3 root nodes representing the main themes
- Build a hierarchical structure with reasonable depth (3-5 levels recommended)
- Titles should be concise and meaningful (preferably 10-20 characters)
- Assign different colors to different main branches for visual distinction
- Use hex color codes (e.g., #ff6b6b, #4ecdc4, #ffe66d, #a8e6cf, #ff8b94)
- Return ONLY the JSON object, nothing else

Text to analyze:"##;

/// Prompt asking for a short node title from a question/answer pair.
pub fn title_prompt(question: &str, answer: &str) -> String {
    format!(
        "Summarize the following question and answer into a short, concise \
         title (around 10-15 characters). Output only the title text.\n\n\
         Question: {question}\n\nAnswer: {answer}"
    )
}

/// Prompt asking for four related keywords branching off `title`,
/// informed by the conversation leading to the node.
pub fn association_prompt(title: &str, context: &[ChatMessage]) -> String {
    let rendered = if context.is_empty() {
        "There is no conversation context; associate from the title alone.".to_owned()
    } else {
        context
            .iter()
            .map(|message| {
                let tag = match message.role() {
                    ChatRole::User => "Q",
                    _ => "A",
                };
                format!("{tag}: {}", message.content())
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "Given the conversation context below, suggest the four most \
         insightful keywords to expand from the node \"{title}\". Output \
         them comma-separated, in the format: keyword1,keyword2,keyword3,\
         keyword4. No extra explanation or numbering.\n\n\
         Conversation context:\n{rendered}"
    )
}

/// Prompt asking the model to clean up a draft chat message without
/// changing its meaning.
pub fn refine_prompt(context: &[ChatMessage], draft: &str) -> String {
    let rendered = context
        .iter()
        .map(|message| format!("{}: {}", role_label(message.role()), message.content()))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "You improve draft chat messages. Fix typos and grammar in the text \
         below and make it clearer and more natural, using the given chat \
         context as reference. Preserve the original meaning exactly. \
         Return only the improved text, with no explanation, decoration, \
         or quotation marks.\n\n\
         Chat context:\n{rendered}\n\n\
         Text to improve: \"{draft}\""
    )
}

/// Render a transcript as `role: content` lines for generation prompts.
pub fn render_transcript(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|message| format!("{}: {}", role_label(message.role()), message.content()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn role_label(role: ChatRole) -> &'static str {
    match role {
        ChatRole::System => "system",
        ChatRole::User => "user",
        ChatRole::Assistant => "assistant",
    }
}
