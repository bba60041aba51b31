//! Text completer port for chat-style completion APIs.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A single chat-style completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The resolved model identifier (e.g., `"deepseek-chat"`).
    pub model: String,
    /// Instruction sent with the `system` role.
    pub system: String,
    /// Prompt sent with the `user` role.
    pub user: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Response-length ceiling in tokens.
    pub max_tokens: u32,
}

/// Unstructured text returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// The generated text.
    pub text: String,
}

/// Boxed future type returned by [`TextCompleter::complete`].
pub type CompleteFuture<'a> =
    Pin<Box<dyn Future<Output = Result<CompletionResponse, AppError>> + Send + 'a>>;

/// Turns a prompt into raw text via an external API.
pub trait TextCompleter: Send + Sync {
    /// Send the request and return the generated text.
    fn complete(&self, request: &CompletionRequest) -> CompleteFuture<'_>;
}
