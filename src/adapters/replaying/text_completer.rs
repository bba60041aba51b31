//! Replaying adapter for the `TextCompleter` port.

use std::sync::{Arc, Mutex};

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::text_completer::{
    CompleteFuture, CompletionRequest, CompletionResponse, TextCompleter,
};

/// Serves recorded completions from a cassette.
pub struct ReplayingTextCompleter {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingTextCompleter {
    /// Create a replaying completer backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl TextCompleter for ReplayingTextCompleter {
    fn complete(&self, _request: &CompletionRequest) -> CompleteFuture<'_> {
        let output = next_output(&self.replayer, "text_completer", "complete");
        Box::pin(async move { replay_result::<CompletionResponse>(output) })
    }
}
