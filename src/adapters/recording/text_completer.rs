//! Recording adapter for the `TextCompleter` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::text_completer::{CompleteFuture, CompletionRequest, TextCompleter};

/// Records completion interactions while delegating to an inner implementation.
pub struct RecordingTextCompleter {
    inner: Box<dyn TextCompleter>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingTextCompleter {
    /// Creates a new recording completer wrapping the given implementation.
    pub fn new(inner: Box<dyn TextCompleter>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl TextCompleter for RecordingTextCompleter {
    fn complete(&self, request: &CompletionRequest) -> CompleteFuture<'_> {
        let request_clone = request.clone();
        let recorder = Arc::clone(&self.recorder);

        Box::pin(async move {
            let result = self.inner.complete(&request_clone).await;
            record_result(&recorder, "text_completer", "complete", &request_clone, &result);
            result
        })
    }
}
