//! Live adapter that downloads images over HTTP.

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use tracing::debug;

use crate::error::AppError;
use crate::ports::image_fetcher::{FetchFuture, FetchedImage, ImageFetcher};

/// Some image hosts reject requests without a browser identification.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                                  (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Fetches image bytes with a plain GET.
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    /// Create a new fetcher.
    #[must_use]
    pub fn new() -> Self {
        Self { client: Client::new() }
    }
}

impl Default for HttpImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, url: &str) -> FetchFuture<'_> {
        let url = url.to_string();
        Box::pin(async move {
            let response = self
                .client
                .get(&url)
                .header(USER_AGENT, BROWSER_USER_AGENT)
                .send()
                .await
                .map_err(|e| unreachable_host(&url, &e))?;

            let status = response.status();
            if !status.is_success() {
                debug!(url = %url, status = status.as_u16(), "image host rejected request");
                return Err(AppError::ImageFetch { status: status.as_u16() });
            }

            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let data =
                response.bytes().await.map_err(|e| unreachable_host(&url, &e))?.to_vec();
            debug!(url = %url, bytes = data.len(), content_type = ?content_type, "fetched image");

            Ok(FetchedImage { data, content_type })
        })
    }
}

/// Transport failures are reported as image-fetch errors, not generic network ones.
fn unreachable_host(url: &str, err: &reqwest::Error) -> AppError {
    debug!(url = %url, error = %err, "image download failed");
    let reason = if err.is_timeout() {
        "request timed out"
    } else if err.is_connect() {
        "could not connect to host"
    } else if err.is_body() || err.is_decode() {
        "download interrupted"
    } else {
        "request failed"
    };
    AppError::ImageUnreachable(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn refused_connection_is_an_image_fetch_error() {
        // Nothing listens on the discard port on loopback.
        let err = HttpImageFetcher::new().fetch("http://127.0.0.1:9/photo.jpg").await.unwrap_err();
        assert!(matches!(err, AppError::ImageUnreachable(_)), "{err:?}");
        assert!(err.to_string().starts_with("Unable to fetch the image from the provided URL"));
    }
}
