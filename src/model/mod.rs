// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A mind map is a single-parent forest: nodes plus parent→child edges,
//! with chat turns derived from node question/answer pairs.

pub mod chat;
pub mod edge;
pub mod fixtures;
pub mod graph;
pub mod ids;
pub mod node;

pub use chat::{ChatMessage, ChatRole};
pub use edge::MapEdge;
pub use graph::MindMap;
pub use ids::{edge_id_for, EdgeId, Id, IdError, NodeId};
pub use node::{MapNode, NodeData, NodeKind, NodePatch, Position, DEFAULT_ROOT_COLOR};
