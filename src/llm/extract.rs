// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Structured mind-map outlines from raw model text.
//!
//! Models are told to answer with bare JSON but routinely wrap it in a
//! code fence anyway; the fence is stripped before parsing. Anything that
//! fails the shape checks is a hard failure for the calling operation.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::model::{IdError, NodeId};

/// One node of a generated outline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutlineNode {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// One parent→child link of a generated outline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutlineEdge {
    pub source: String,
    pub target: String,
}

/// The structured generation payload:
/// `{"nodes":[{"id","title","color"?}], "edges":[{"source","target"}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MapOutline {
    pub nodes: Vec<OutlineNode>,
    #[serde(default)]
    pub edges: Vec<OutlineEdge>,
}

#[derive(Debug)]
pub enum OutlineError {
    InvalidJson { source: serde_json::Error },
    NoNodes,
    InvalidNodeId { id: String, source: IdError },
    DuplicateNodeId { id: String },
    BlankTitle { id: String },
    UnknownEndpoint { id: String },
}

impl fmt::Display for OutlineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidJson { source } => {
                write!(f, "generated outline is not valid JSON: {source}")
            }
            Self::NoNodes => f.write_str("generated outline contains no nodes"),
            Self::InvalidNodeId { id, source } => {
                write!(f, "generated outline node id {id:?} is invalid: {source}")
            }
            Self::DuplicateNodeId { id } => {
                write!(f, "generated outline repeats node id {id:?}")
            }
            Self::BlankTitle { id } => {
                write!(f, "generated outline node {id:?} has a blank title")
            }
            Self::UnknownEndpoint { id } => {
                write!(f, "generated outline edge references unknown node {id:?}")
            }
        }
    }
}

impl std::error::Error for OutlineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidJson { source } => Some(source),
            Self::InvalidNodeId { source, .. } => Some(source),
            _ => None,
        }
    }
}

fn fence_wrapper() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)^```[A-Za-z0-9_-]*[ \t]*\n(.*?)\n?```$").expect("fence pattern compiles")
    })
}

/// Drop an optional surrounding ```-fence (with or without a language tag)
/// from a model response. Text without a wrapper passes through trimmed.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    match fence_wrapper().captures(trimmed) {
        Some(captures) => captures.get(1).map_or(trimmed, |m| m.as_str()),
        None => trimmed,
    }
}

/// Parse and shape-check a generated outline.
///
/// Rejected: unparseable JSON, empty node lists, ids that are not valid
/// id segments, repeated ids, blank titles, and edges whose endpoints are
/// not in the node list.
pub fn parse_outline(raw: &str) -> Result<MapOutline, OutlineError> {
    let payload = strip_code_fence(raw);
    let outline: MapOutline = serde_json::from_str(payload)
        .map_err(|source| OutlineError::InvalidJson { source })?;

    if outline.nodes.is_empty() {
        return Err(OutlineError::NoNodes);
    }

    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for node in &outline.nodes {
        NodeId::new(node.id.clone()).map_err(|source| OutlineError::InvalidNodeId {
            id: node.id.clone(),
            source,
        })?;
        if !seen.insert(node.id.as_str()) {
            return Err(OutlineError::DuplicateNodeId {
                id: node.id.clone(),
            });
        }
        if node.title.trim().is_empty() {
            return Err(OutlineError::BlankTitle {
                id: node.id.clone(),
            });
        }
    }

    for edge in &outline.edges {
        for endpoint in [&edge.source, &edge.target] {
            if !seen.contains(endpoint.as_str()) {
                return Err(OutlineError::UnknownEndpoint {
                    id: endpoint.clone(),
                });
            }
        }
    }

    Ok(outline)
}

#[cfg(test)]
mod tests {
    use super::{parse_outline, strip_code_fence, OutlineError};
    use rstest::rstest;

    const VALID: &str = r##"{"nodes": [{"id": "a", "title": "Root", "color": "#ff6b6b"}, {"id": "b", "title": "Child"}], "edges": [{"source": "a", "target": "b"}]}"##;

    #[rstest]
    #[case("{\"x\":1}", "{\"x\":1}")]
    #[case("```json\n{\"x\":1}\n```", "{\"x\":1}")]
    #[case("```\n{\"x\":1}\n```", "{\"x\":1}")]
    #[case("  ```json\n{\"x\":1}\n```  ", "{\"x\":1}")]
    fn fence_stripping_cases(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_code_fence(input), expected);
    }

    #[test]
    fn parses_a_valid_outline_with_and_without_fence() {
        let outline = parse_outline(VALID).expect("bare");
        assert_eq!(outline.nodes.len(), 2);
        assert_eq!(outline.edges.len(), 1);
        assert_eq!(outline.nodes[1].color, None);

        let fenced = format!("```json\n{VALID}\n```");
        assert_eq!(parse_outline(&fenced).expect("fenced"), outline);
    }

    #[test]
    fn rejects_non_json_and_empty_outlines() {
        assert!(matches!(
            parse_outline("Sure! Here is your mind map."),
            Err(OutlineError::InvalidJson { .. })
        ));
        assert!(matches!(
            parse_outline(r#"{"nodes": [], "edges": []}"#),
            Err(OutlineError::NoNodes)
        ));
    }

    #[test]
    fn rejects_duplicate_ids_blank_titles_and_dangling_edges() {
        let duplicate = r#"{"nodes": [{"id": "a", "title": "X"}, {"id": "a", "title": "Y"}]}"#;
        assert!(matches!(
            parse_outline(duplicate),
            Err(OutlineError::DuplicateNodeId { .. })
        ));

        let blank = r#"{"nodes": [{"id": "a", "title": "  "}]}"#;
        assert!(matches!(
            parse_outline(blank),
            Err(OutlineError::BlankTitle { .. })
        ));

        let dangling = r#"{"nodes": [{"id": "a", "title": "X"}], "edges": [{"source": "a", "target": "zz"}]}"#;
        assert!(matches!(
            parse_outline(dangling),
            Err(OutlineError::UnknownEndpoint { .. })
        ));
    }

    #[test]
    fn rejects_ids_that_are_not_valid_segments() {
        let slashed = r#"{"nodes": [{"id": "a/b", "title": "X"}]}"#;
        assert!(matches!(
            parse_outline(slashed),
            Err(OutlineError::InvalidNodeId { .. })
        ));
    }
}
