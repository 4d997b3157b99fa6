// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! MCP server surface.
//!
//! Exposes the map command surface over the Model Context Protocol, for
//! UI layers and tool integrations (stdio or streamable HTTP).

pub mod server;
pub mod types;

pub use server::RhizomeMcp;
