// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The export document format.
//!
//! A single markdown file combining a diagram preview fence with the
//! authoritative JSON payload fence.

pub mod document;

pub use document::{
    export_document, parse_document, DocumentExportError, DocumentParseError, DOCUMENT_TITLE,
};
