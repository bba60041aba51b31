//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and an
//! external system. Implementations live in `src/adapters/`.

pub mod image_fetcher;
pub mod text_completer;

pub use image_fetcher::{FetchedImage, ImageFetcher};
pub use text_completer::{CompletionRequest, CompletionResponse, TextCompleter};
