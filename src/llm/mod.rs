// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The language-model boundary.
//!
//! The engine consumes a chat-completion service through [`ChatModel`]:
//! an ordered list of role-tagged messages in, plain text out, typed
//! failure otherwise. The engine never interprets model text except where
//! it expects the structured mind-map outline (`extract`).

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::model::ChatMessage;

pub mod client;
pub mod extract;
pub mod prompts;

pub use client::{ModelConfig, OpenRouterClient};
pub use extract::{parse_outline, MapOutline, OutlineEdge, OutlineError, OutlineNode};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A chat-completion backend. Object-safe so surfaces can hold a
/// `dyn ChatModel` chosen at startup.
pub trait ChatModel: Send + Sync {
    fn complete<'a>(
        &'a self,
        messages: &'a [ChatMessage],
    ) -> BoxFuture<'a, Result<String, ModelError>>;
}

/// Failures of the model boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// No API key configured; refused before any request is made.
    MissingApiKey,
    /// The HTTP request itself failed (connect, timeout, body).
    Request { message: String },
    /// The service answered with a non-success status.
    Api { status: u16, message: String },
    /// A 2xx response that does not carry the expected completion shape.
    MalformedResponse { message: String },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => {
                f.write_str("OPENROUTER_API_KEY is not set; configure it before using model features")
            }
            Self::Request { message } => write!(f, "model request failed: {message}"),
            Self::Api { status, message } => {
                write!(f, "model API returned status {status}: {message}")
            }
            Self::MalformedResponse { message } => {
                write!(f, "model response had an unexpected shape: {message}")
            }
        }
    }
}

impl std::error::Error for ModelError {}
