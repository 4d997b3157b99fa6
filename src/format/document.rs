// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::model::MindMap;

/// First line of every exported document.
pub const DOCUMENT_TITLE: &str = "# MindMap Export";

/// Quote characters inside preview labels would terminate the label early,
/// so they are escaped the way the diagram syntax expects.
fn escape_preview_title(title: &str) -> String {
    title.replace('"', "#quot;")
}

fn preview_block(map: &MindMap) -> String {
    let mut out = String::new();
    out.push_str("```mermaid\ngraph TD\n");
    for node in map.nodes() {
        out.push_str("  ");
        out.push_str(node.id().as_str());
        out.push_str("[\"");
        out.push_str(&escape_preview_title(node.data().title()));
        out.push_str("\"]\n");
    }
    for edge in map.edges() {
        out.push_str("  ");
        out.push_str(edge.source().as_str());
        out.push_str(" --> ");
        out.push_str(edge.target().as_str());
        out.push('\n');
    }
    out.push_str("```");
    out
}

#[derive(Debug)]
pub enum DocumentExportError {
    Json { source: serde_json::Error },
}

impl fmt::Display for DocumentExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json { source } => write!(f, "cannot serialize map payload: {source}"),
        }
    }
}

impl std::error::Error for DocumentExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json { source } => Some(source),
        }
    }
}

/// Serialize the full map into the export document: a human-readable
/// diagram preview followed by the machine-readable JSON payload. Only the
/// payload fence participates in round-tripping.
pub fn export_document(map: &MindMap) -> Result<String, DocumentExportError> {
    let payload = serde_json::to_string_pretty(map)
        .map_err(|source| DocumentExportError::Json { source })?;

    Ok(format!(
        "{DOCUMENT_TITLE}\n\n## Preview\n{}\n\n---\n## Data\n```json\n{payload}\n```\n",
        preview_block(map)
    ))
}

#[derive(Debug)]
pub enum DocumentParseError {
    /// No ```json fence in the document.
    MissingPayload,
    /// The fence contents are not parseable JSON.
    InvalidJson { source: serde_json::Error },
    /// The payload parses but lacks a `nodes` or `edges` list.
    MissingCollections,
    /// The payload has the right top-level shape but its entries do not
    /// match the node/edge model.
    InvalidShape { source: serde_json::Error },
}

impl fmt::Display for DocumentParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPayload => {
                f.write_str("document has no ```json payload fence")
            }
            Self::InvalidJson { source } => {
                write!(f, "payload fence is not valid JSON: {source}")
            }
            Self::MissingCollections => {
                f.write_str("payload must carry both a 'nodes' and an 'edges' list")
            }
            Self::InvalidShape { source } => {
                write!(f, "payload entries do not match the map model: {source}")
            }
        }
    }
}

impl std::error::Error for DocumentParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidJson { source } | Self::InvalidShape { source } => Some(source),
            Self::MissingPayload | Self::MissingCollections => None,
        }
    }
}

fn payload_fence() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)```json\n(.*?)\n```").expect("payload fence pattern compiles")
    })
}

/// Locate the tagged payload fence and decode it into a map.
///
/// The preview fence is presentation-only and lossy (titles are escaped),
/// so it is never consulted; any failure returns an error with no partial
/// result.
pub fn parse_document(input: &str) -> Result<MindMap, DocumentParseError> {
    let captures = payload_fence()
        .captures(input)
        .ok_or(DocumentParseError::MissingPayload)?;
    let raw = captures
        .get(1)
        .map(|m| m.as_str())
        .ok_or(DocumentParseError::MissingPayload)?;

    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|source| DocumentParseError::InvalidJson { source })?;

    let has_nodes = value.get("nodes").is_some_and(serde_json::Value::is_array);
    let has_edges = value.get("edges").is_some_and(serde_json::Value::is_array);
    if !has_nodes || !has_edges {
        return Err(DocumentParseError::MissingCollections);
    }

    serde_json::from_value(value).map_err(|source| DocumentParseError::InvalidShape { source })
}
