// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only queries over the map.
//!
//! Queries derive structure (parents, descendants, ancestor chains, chat
//! context) from the edge list and never mutate store state.

pub mod context;
pub mod guard;
pub mod walk;

pub use context::chat_context;
pub use guard::{validate_connection, ConnectError};
pub use walk::{ancestor_path, children_map, descendants, parent_map, roots};
