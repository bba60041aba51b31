//! Unified error type for listingkit.

use thiserror::Error;

/// Errors that can occur while producing a listing.
#[derive(Debug, Error)]
pub enum AppError {
    /// An API returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message or body from the API.
        message: String,
    },

    /// A network error occurred.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The image host answered with a non-success status.
    #[error("Unable to fetch the image from the provided URL (HTTP {status})")]
    ImageFetch {
        /// HTTP status code.
        status: u16,
    },

    /// The image host could not be reached or the download was cut short.
    #[error("Unable to fetch the image from the provided URL: {0}")]
    ImageUnreachable(String),

    /// The text service answered 2xx with a body that is not a chat completion.
    #[error("Unexpected response from the text service: {0}")]
    UnexpectedResponse(String),

    /// The text service replied without the `Title:`/`Description:` markers.
    #[error("Reply did not contain the expected 'Title:' and 'Description:' fields")]
    MalformedReply {
        /// The raw reply, kept for diagnostics.
        raw: String,
    },

    /// The image is encoded in a format the downstream consumer cannot render.
    #[error("Unsupported image format: {0}. Accepted formats: WEBP, PNG, JPEG")]
    UnsupportedFormat(String),

    /// The bytes could not be decoded as an image.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// The image is smaller than the quality floor.
    #[error("Image resolution is too low ({width}x{height}). Minimum required: 500x500 pixels")]
    ResolutionTooLow {
        /// Source width in pixels.
        width: u32,
        /// Source height in pixels.
        height: u32,
    },

    /// The normalized canvas could not be encoded.
    #[error("Failed to encode image: {0}")]
    Encode(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No API key configured for the text backend.
    #[error("No API key for {provider}. Set {env_var} or add it to config file.")]
    MissingApiKey {
        /// The backend name.
        provider: String,
        /// The environment variable name.
        env_var: String,
    },

    /// One or more processing steps failed.
    #[error("{failed} of 2 steps failed")]
    Incomplete {
        /// Number of failed steps.
        failed: usize,
    },
}
