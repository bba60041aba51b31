//! Saving the normalized photo and rendering the listing report.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::warn;

use crate::error::AppError;
use crate::normalize::Placement;
use crate::pipeline::ListingOutcome;

/// Write image bytes to `output_path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_image(data: &[u8], output_path: &Path) -> Result<(), AppError> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output_path, data)?;
    Ok(())
}

/// Save the normalized photo of a successful image step.
///
/// A write failure replaces the image result, so the copy is still reported
/// and the run ends as incomplete. Returns the path actually written.
pub fn save_outcome_image(outcome: &mut ListingOutcome, output_path: &Path) -> Option<PathBuf> {
    let saved = match &outcome.image {
        Ok(image) => save_image(&image.data, output_path),
        Err(_) => return None,
    };
    match saved {
        Ok(()) => Some(output_path.to_path_buf()),
        Err(e) => {
            warn!(path = %output_path.display(), error = %e, "could not save normalized image");
            outcome.image = Err(e);
            None
        }
    }
}

/// Human-readable copy block for stdout. Empty when copy generation failed.
#[must_use]
pub fn render_copy(outcome: &ListingOutcome) -> String {
    match &outcome.copy {
        Ok(copy) => format!("Title: {}\nDescription: {}", copy.title, copy.description),
        Err(_) => String::new(),
    }
}

/// Step errors, one line each, for stderr.
#[must_use]
pub fn render_errors(outcome: &ListingOutcome) -> Vec<String> {
    let mut lines = Vec::new();
    if let Err(e) = &outcome.copy {
        lines.push(format!("Content error: {e}"));
    }
    if let Err(e) = &outcome.image {
        lines.push(format!("Image error: {e}"));
    }
    lines
}

/// Machine-readable form of a [`ListingOutcome`].
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    /// Generated title, absent on failure.
    pub title: Option<&'a str>,
    /// Generated description, absent on failure.
    pub description: Option<&'a str>,
    /// Copy generation error message.
    pub content_error: Option<String>,
    /// Where the normalized photo was written.
    pub image_path: Option<String>,
    /// Format the source photo was decoded from.
    pub source_format: Option<String>,
    /// Source photo dimensions.
    pub source_size: Option<(u32, u32)>,
    /// Position of the photo on the canvas.
    pub placement: Option<Placement>,
    /// Image step error message.
    pub image_error: Option<String>,
}

/// Render the outcome as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(outcome: &ListingOutcome, saved_to: Option<&Path>) -> Result<String, AppError> {
    let copy = outcome.copy.as_ref().ok();
    let image = outcome.image.as_ref().ok();
    let report = JsonReport {
        title: copy.map(|c| c.title.as_str()),
        description: copy.map(|c| c.description.as_str()),
        content_error: outcome.copy.as_ref().err().map(ToString::to_string),
        image_path: saved_to.map(|p| p.display().to_string()),
        source_format: image.map(|img| format!("{:?}", img.source_format).to_uppercase()),
        source_size: image.map(|img| img.source_size),
        placement: image.map(|img| img.placement),
        image_error: outcome.image.as_ref().err().map(ToString::to_string),
    };
    serde_json::to_string_pretty(&report)
        .map_err(|e| AppError::Io(std::io::Error::other(e)))
}
