//! Live adapter for OpenAI-compatible chat completions APIs.

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::AppError;
use crate::model::Backend;
use crate::ports::text_completer::{
    CompleteFuture, CompletionRequest, CompletionResponse, TextCompleter,
};

/// Live completer for any backend speaking the chat completions format.
///
/// The credential is injected at construction; a missing key is reported
/// on the first call without touching the network.
pub struct ChatCompletionsCompleter {
    client: Client,
    backend: Backend,
    api_key: Option<String>,
}

impl ChatCompletionsCompleter {
    /// Create a new completer for `backend` with an optional API key.
    #[must_use]
    pub fn new(backend: Backend, api_key: Option<String>) -> Self {
        Self { client: Client::new(), backend, api_key }
    }
}

impl TextCompleter for ChatCompletionsCompleter {
    fn complete(&self, request: &CompletionRequest) -> CompleteFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let api_key = self.api_key.as_deref().ok_or_else(|| AppError::MissingApiKey {
                provider: self.backend.display_name().into(),
                env_var: self.backend.env_var().into(),
            })?;

            let url = self.backend.endpoint();
            debug!(
                backend = self.backend.display_name(),
                url,
                model = %request.model,
                "sending completion request"
            );

            let response = self
                .client
                .post(url)
                .bearer_auth(api_key)
                .json(&request_body(&request))
                .send()
                .await?;

            let status = response.status();
            let response_text = response.text().await?;
            debug!(status = status.as_u16(), bytes = response_text.len(), "completion response");

            if !status.is_success() {
                return Err(AppError::Api { status: status.as_u16(), message: response_text });
            }

            let text = completion_text(&response_text)?;
            Ok(CompletionResponse { text })
        })
    }
}

/// JSON body for a chat completions request: system + user messages.
fn request_body(request: &CompletionRequest) -> Value {
    json!({
        "model": request.model,
        "messages": [
            {"role": "system", "content": request.system},
            {"role": "user", "content": request.user},
        ],
        "temperature": request.temperature,
        "max_tokens": request.max_tokens,
    })
}

/// Extract the first choice's message content from a 2xx body.
fn completion_text(body: &str) -> Result<String, AppError> {
    let parsed: ChatResponse = serde_json::from_str(body).map_err(|e| {
        AppError::UnexpectedResponse(format!("{e}. Body: {}", truncated(body)))
    })?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            AppError::UnexpectedResponse(format!("no completion text. Body: {}", truncated(body)))
        })
}

/// Shorten a response body for inclusion in an error message.
fn truncated(body: &str) -> String {
    if body.chars().count() > 500 {
        format!("{}...", body.chars().take(500).collect::<String>())
    } else {
        body.to_string()
    }
}

// --- Chat completions response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}
