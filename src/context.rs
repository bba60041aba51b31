//! Service context that bundles all port trait objects.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::adapters::live::chat_completions::ChatCompletionsCompleter;
use crate::adapters::live::http_fetcher::HttpImageFetcher;
use crate::adapters::recording::image_fetcher::RecordingImageFetcher;
use crate::adapters::recording::text_completer::RecordingTextCompleter;
use crate::adapters::replaying::image_fetcher::ReplayingImageFetcher;
use crate::adapters::replaying::text_completer::ReplayingTextCompleter;
use crate::cassette::config::load_cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::config::Config;
use crate::error::AppError;
use crate::model::Backend;
use crate::ports::{ImageFetcher, TextCompleter};

/// Bundles all port trait objects into a single context.
pub struct ServiceContext {
    /// Text completion port.
    pub completer: Box<dyn TextCompleter>,
    /// Image download port.
    pub fetcher: Box<dyn ImageFetcher>,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Finish the recording and write the cassette file to disk.
    ///
    /// Drop the [`ServiceContext`] first so the adapters release the recorder.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "Recording adapters still hold references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        recorder.finish().map_err(|e| format!("Failed to write cassette: {e}"))
    }
}

impl ServiceContext {
    /// Create a live context for the given backend.
    ///
    /// A missing API key does not fail here; the completer reports it on use
    /// so the image step can still run.
    #[must_use]
    pub fn live(backend: Backend, config: &Config) -> Self {
        Self {
            completer: Box::new(ChatCompletionsCompleter::new(backend, config.api_key(backend))),
            fetcher: Box::new(HttpImageFetcher::new()),
        }
    }

    /// Create a recording context that wraps the live adapters with a recorder.
    #[must_use]
    pub fn recording(backend: Backend, config: &Config) -> (Self, RecordingSession) {
        let live_ctx = Self::live(backend, config);

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = PathBuf::from(".listingkit/cassettes")
            .join(&timestamp)
            .join("session.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-session"),
            get_commit_hash(),
        )));

        let ctx = Self {
            completer: Box::new(RecordingTextCompleter::new(
                live_ctx.completer,
                Arc::clone(&recorder),
            )),
            fetcher: Box::new(RecordingImageFetcher::new(live_ctx.fetcher, Arc::clone(&recorder))),
        };
        (ctx, RecordingSession { recorder })
    }

    /// Create a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, AppError> {
        let replayer = load_cassette(path)
            .map_err(|e| AppError::Config(format!("Failed to load cassette: {e}")))?;
        debug!(path = %path.display(), interactions = replayer.remaining(), "loaded cassette");
        let replayer = Arc::new(Mutex::new(replayer));
        Ok(Self {
            completer: Box::new(ReplayingTextCompleter::new(Arc::clone(&replayer))),
            fetcher: Box::new(ReplayingImageFetcher::new(replayer)),
        })
    }
}

/// Get the current git commit hash, or "unknown" if unavailable.
fn get_commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}
