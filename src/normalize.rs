//! Product photo normalization onto a fixed white canvas.
//!
//! Every accepted photo comes out as a 1200x800 opaque JPEG with the source
//! shrunk to fit a 1100x700 box and centered.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, ImageReader, Rgba, RgbaImage, RgbImage};
use serde::Serialize;
use tracing::debug;

use crate::error::AppError;
use crate::ports::ImageFetcher;

/// Output canvas width.
pub const CANVAS_WIDTH: u32 = 1200;
/// Output canvas height.
pub const CANVAS_HEIGHT: u32 = 800;
/// Largest width the pasted photo may have.
pub const FIT_WIDTH: u32 = 1100;
/// Largest height the pasted photo may have.
pub const FIT_HEIGHT: u32 = 700;
/// Smallest accepted source width and height.
pub const MIN_SOURCE_DIMENSION: u32 = 500;

const JPEG_QUALITY: u8 = 100;
const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Where the scaled photo sits on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    /// Left offset.
    pub x: u32,
    /// Top offset.
    pub y: u32,
    /// Scaled width.
    pub width: u32,
    /// Scaled height.
    pub height: u32,
}

/// A normalized photo, JPEG encoded.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    /// JPEG bytes of the full canvas.
    pub data: Vec<u8>,
    /// Format the source was decoded from.
    pub source_format: ImageFormat,
    /// Source dimensions.
    pub source_size: (u32, u32),
    /// Position of the photo on the canvas.
    pub placement: Placement,
}

/// Decode, validate, scale, composite and encode raw image bytes.
///
/// # Errors
///
/// Checks run in order and the first failure is returned:
/// [`AppError::UnsupportedFormat`] / [`AppError::Decode`],
/// [`AppError::ResolutionTooLow`], then [`AppError::Encode`].
pub fn normalize_bytes(bytes: &[u8]) -> Result<NormalizedImage, AppError> {
    let (source, source_format) = decode(bytes)?;
    let source_size = (source.width(), source.height());
    check_resolution(source_size.0, source_size.1)?;

    let (fit_w, fit_h) = fit_within(source_size.0, source_size.1, FIT_WIDTH, FIT_HEIGHT);
    let scaled = if (fit_w, fit_h) == source_size {
        source
    } else {
        imageops::resize(&source, fit_w, fit_h, FilterType::Lanczos3)
    };

    let (canvas, placement) = composite(&scaled);
    debug!(
        format = ?source_format,
        source_width = source_size.0,
        source_height = source_size.1,
        x = placement.x,
        y = placement.y,
        width = placement.width,
        height = placement.height,
        "composited photo"
    );
    let data = encode_jpeg(&canvas)?;

    Ok(NormalizedImage { data, source_format, source_size, placement })
}

/// Decode bytes into RGBA, accepting only WEBP, PNG and JPEG sources.
fn decode(bytes: &[u8]) -> Result<(RgbaImage, ImageFormat), AppError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| AppError::Decode(e.to_string()))?;
    let Some(format) = reader.format() else {
        return Err(match container_brand(bytes) {
            Some(brand) => AppError::UnsupportedFormat(brand),
            None => AppError::Decode("unrecognized image data".to_string()),
        });
    };

    if !matches!(format, ImageFormat::WebP | ImageFormat::Png | ImageFormat::Jpeg) {
        return Err(AppError::UnsupportedFormat(format!("{format:?}").to_uppercase()));
    }

    let image = reader.decode().map_err(|e| AppError::Decode(e.to_string()))?;
    Ok((image.to_rgba8(), format))
}

/// Name the ISO-BMFF image family (HEIC, AVIF, ...) from the `ftyp` box.
///
/// These containers are recognizable images even when no decoder for them is
/// compiled in.
fn container_brand(bytes: &[u8]) -> Option<String> {
    if bytes.get(4..8)? != b"ftyp" {
        return None;
    }
    let brand = std::str::from_utf8(bytes.get(8..12)?).ok()?.trim();
    let family = match brand {
        "heic" | "heix" | "hevc" | "hevx" => "HEIC",
        "mif1" | "msf1" | "heif" => "HEIF",
        "avif" | "avis" => "AVIF",
        other if !other.is_empty() && other.chars().all(|c| c.is_ascii_alphanumeric()) => {
            return Some(other.to_uppercase());
        }
        _ => return None,
    };
    Some(family.to_string())
}

/// Reject sources below the minimum resolution.
fn check_resolution(width: u32, height: u32) -> Result<(), AppError> {
    if width < MIN_SOURCE_DIMENSION || height < MIN_SOURCE_DIMENSION {
        return Err(AppError::ResolutionTooLow { width, height });
    }
    Ok(())
}

/// Largest size within `max_w`x`max_h` with the source aspect ratio.
///
/// Never enlarges. Rounds half up and keeps at least one pixel per side.
#[must_use]
pub fn fit_within(width: u32, height: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if width <= max_w && height <= max_h {
        return (width, height);
    }
    let (w, h) = (u64::from(width), u64::from(height));
    let (mw, mh) = (u64::from(max_w), u64::from(max_h));

    // Width is the binding side when w/h >= max_w/max_h.
    let (fit_w, fit_h) = if w * mh >= h * mw {
        (mw, (h * mw + w / 2) / w)
    } else {
        ((w * mh + h / 2) / h, mh)
    };
    let clamp = |v: u64, max: u32| u32::try_from(v).map_or(max, |v| v.clamp(1, max));
    (clamp(fit_w, max_w), clamp(fit_h, max_h))
}

/// Paste `photo` centered on a white canvas and drop the alpha channel.
///
/// Transparent photo pixels blend into the white background.
#[must_use]
pub fn composite(photo: &RgbaImage) -> (RgbImage, Placement) {
    let placement = Placement {
        x: CANVAS_WIDTH.saturating_sub(photo.width()) / 2,
        y: CANVAS_HEIGHT.saturating_sub(photo.height()) / 2,
        width: photo.width(),
        height: photo.height(),
    };

    let mut canvas = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, BACKGROUND);
    imageops::overlay(&mut canvas, photo, i64::from(placement.x), i64::from(placement.y));

    (DynamicImage::ImageRgba8(canvas).to_rgb8(), placement)
}

/// Encode an opaque canvas as maximum-quality JPEG.
fn encode_jpeg(canvas: &RgbImage) -> Result<Vec<u8>, AppError> {
    let mut data = Vec::new();
    JpegEncoder::new_with_quality(&mut data, JPEG_QUALITY)
        .encode_image(canvas)
        .map_err(|e| AppError::Encode(e.to_string()))?;
    Ok(data)
}

/// Fetches a photo and normalizes it.
pub struct ImageNormalizer<'a> {
    fetcher: &'a dyn ImageFetcher,
}

impl<'a> ImageNormalizer<'a> {
    /// Create a normalizer that downloads through `fetcher`.
    #[must_use]
    pub fn new(fetcher: &'a dyn ImageFetcher) -> Self {
        Self { fetcher }
    }

    /// Download `url` and normalize the result.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, or any error from [`normalize_bytes`].
    pub async fn normalize(&self, url: &str) -> Result<NormalizedImage, AppError> {
        let fetched = self.fetcher.fetch(url).await?;
        match (normalize_bytes(&fetched.data), fetched.content_type) {
            (Err(AppError::Decode(reason)), Some(content_type)) => {
                Err(AppError::Decode(format!("{reason} (served as {content_type})")))
            }
            (result, _) => result,
        }
    }
}
