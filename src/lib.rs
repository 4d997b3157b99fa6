// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Rhizome — mind-map graph engine with LLM-assisted workflows.
//!
//! The crate is the state-and-graph core of a mind-mapping editor: the
//! single-writer store, its structural invariants, the derived queries and
//! layout, the round-trip document format, and the model-backed composite
//! workflows. Rendering is someone else's job; the command surface is an
//! MCP server.

pub mod format;
pub mod layout;
pub mod llm;
pub mod mcp;
pub mod model;
pub mod ops;
pub mod query;
pub mod store;
