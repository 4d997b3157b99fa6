// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use crate::model::ChatMessage;

use super::{BoxFuture, ChatModel, ModelError};

pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "openai/gpt-3.5-turbo";

/// Configuration for the chat-completion client.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Full URL of an OpenAI-compatible chat/completions endpoint.
    pub api_url: String,
    /// Bearer token; requests are refused locally when absent.
    pub api_key: Option<String>,
    /// Model slug sent with every request.
    pub model: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            api_key: None,
            model: DEFAULT_MODEL.to_owned(),
        }
    }
}

impl ModelConfig {
    /// Read `OPENROUTER_API_KEY`, `OPENROUTER_MODEL`, and
    /// `OPENROUTER_API_URL` from the environment; blanks count as unset.
    pub fn from_env() -> Self {
        let read = |name: &str| {
            std::env::var(name)
                .ok()
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self {
            api_key: read("OPENROUTER_API_KEY"),
            ..Self::default()
        };
        if let Some(model) = read("OPENROUTER_MODEL") {
            config.model = model;
        }
        if let Some(api_url) = read("OPENROUTER_API_URL") {
            config.api_url = api_url;
        }
        config
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// [`ChatModel`] over an OpenAI-compatible HTTP endpoint.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    config: ModelConfig,
}

impl OpenRouterClient {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(ModelConfig::from_env())
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    async fn request(&self, messages: &[ChatMessage]) -> Result<String, ModelError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(ModelError::MissingApiKey);
        };

        let body = CompletionRequest {
            model: &self.config.model,
            messages,
        };

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| ModelError::Request {
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .map(|detail| detail.message)
                .unwrap_or_else(|| "API request failed".to_owned());
            return Err(ModelError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: CompletionResponse =
            response.json().await.map_err(|err| ModelError::MalformedResponse {
                message: err.to_string(),
            })?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ModelError::MalformedResponse {
                message: "response carried no choices".to_owned(),
            })
    }
}

impl ChatModel for OpenRouterClient {
    fn complete<'a>(
        &'a self,
        messages: &'a [ChatMessage],
    ) -> BoxFuture<'a, Result<String, ModelError>> {
        Box::pin(self.request(messages))
    }
}
