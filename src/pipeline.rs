//! Runs both listing steps for one product.

use tracing::{info, warn};

use crate::content::{ContentGenerator, GenerationSettings, ListingCopy};
use crate::context::ServiceContext;
use crate::error::AppError;
use crate::normalize::{ImageNormalizer, NormalizedImage};

/// Results of both steps. Each step succeeds or fails on its own.
#[derive(Debug)]
pub struct ListingOutcome {
    /// Generated title and description.
    pub copy: Result<ListingCopy, AppError>,
    /// Normalized photo.
    pub image: Result<NormalizedImage, AppError>,
}

impl ListingOutcome {
    /// Number of steps that failed.
    #[must_use]
    pub fn failed_steps(&self) -> usize {
        usize::from(self.copy.is_err()) + usize::from(self.image.is_err())
    }
}

/// Generate copy, then normalize the photo.
///
/// The image step always runs, even if copy generation failed.
pub async fn process(
    ctx: &ServiceContext,
    settings: GenerationSettings,
    product_name: &str,
    image_url: &str,
) -> ListingOutcome {
    let copy = ContentGenerator::new(ctx.completer.as_ref(), settings).generate(product_name).await;
    match &copy {
        Ok(_) => info!(product = product_name, "generated listing copy"),
        Err(e) => warn!(product = product_name, "copy generation failed: {e}"),
    }

    let image = ImageNormalizer::new(ctx.fetcher.as_ref()).normalize(image_url).await;
    match &image {
        Ok(img) => info!(url = image_url, bytes = img.data.len(), "normalized product photo"),
        Err(e) => warn!(url = image_url, "image normalization failed: {e}"),
    }

    ListingOutcome { copy, image }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::ports::image_fetcher::{FetchFuture, FetchedImage};
    use crate::ports::text_completer::{CompleteFuture, CompletionRequest};
    use crate::ports::{ImageFetcher, TextCompleter};

    struct NoKeyCompleter;

    impl TextCompleter for NoKeyCompleter {
        fn complete(&self, _request: &CompletionRequest) -> CompleteFuture<'_> {
            Box::pin(async {
                Err(AppError::MissingApiKey {
                    provider: "DeepSeek".into(),
                    env_var: "DEEPSEEK_API_KEY".into(),
                })
            })
        }
    }

    struct JpegFetcher(u32, u32);

    impl ImageFetcher for JpegFetcher {
        fn fetch(&self, _url: &str) -> FetchFuture<'_> {
            let img = image::DynamicImage::new_rgb8(self.0, self.1);
            let mut buf = Cursor::new(Vec::new());
            let written = img.write_to(&mut buf, image::ImageFormat::Jpeg);
            Box::pin(async move {
                written.map_err(|e| AppError::Encode(e.to_string()))?;
                Ok(FetchedImage { data: buf.into_inner(), content_type: None })
            })
        }
    }

    fn settings() -> GenerationSettings {
        GenerationSettings { model: "deepseek-chat".into(), temperature: 0.7, max_tokens: 600 }
    }

    #[tokio::test]
    async fn image_step_runs_after_copy_failure() {
        let ctx = ServiceContext { completer: Box::new(NoKeyCompleter), fetcher: Box::new(JpegFetcher(600, 600)) };
        let outcome = process(&ctx, settings(), "Organic Avocado 200g", "https://example.com/a.jpg").await;

        assert!(matches!(outcome.copy, Err(AppError::MissingApiKey { .. })));
        assert_eq!(outcome.image.as_ref().unwrap().placement.width, 600);
        assert_eq!(outcome.failed_steps(), 1);
    }

    #[tokio::test]
    async fn both_failures_are_reported() {
        let ctx = ServiceContext { completer: Box::new(NoKeyCompleter), fetcher: Box::new(JpegFetcher(300, 300)) };
        let outcome = process(&ctx, settings(), "Test", "https://example.com/small.png").await;

        assert!(matches!(outcome.image, Err(AppError::ResolutionTooLow { width: 300, height: 300 })));
        assert_eq!(outcome.failed_steps(), 2);
    }
}
