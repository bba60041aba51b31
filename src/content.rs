//! Marketplace copy generation: prompt building and reply parsing.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::ports::{CompletionRequest, TextCompleter};

/// Maximum title length in characters.
pub const MAX_TITLE_CHARS: usize = 120;
/// Maximum description length in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

const TITLE_MARKER: &str = "Title:";
const DESCRIPTION_MARKER: &str = "Description:";

const SYSTEM_PROMPT: &str =
    "You are an expert in e-commerce SEO, specializing in food delivery marketplace listings.";

/// Title and description ready for a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingCopy {
    /// Product title, at most [`MAX_TITLE_CHARS`] characters.
    pub title: String,
    /// Product description, at most [`MAX_DESCRIPTION_CHARS`] characters.
    pub description: String,
}

/// Outcome of parsing a raw completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedReply {
    /// Both fields were found.
    Listing(ListingCopy),
    /// The reply did not have the expected shape.
    Malformed {
        /// The reply as received.
        raw: String,
    },
}

/// Sampling settings sent with every completion.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    /// Resolved model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Response-length ceiling.
    pub max_tokens: u32,
}

/// Build the completion request for a product.
#[must_use]
pub fn build_request(product_name: &str, settings: &GenerationSettings) -> CompletionRequest {
    let user = format!(
        "Generate a marketplace-optimized product title (max {MAX_TITLE_CHARS} characters) and \
         description (max {MAX_DESCRIPTION_CHARS} characters) for the product: {product_name}.\n\n\
         - Title: Use high-intent customer search keywords and make it conversion-focused.\n\
         - Description: Highlight key benefits, use engaging language, and naturally insert keywords.\n\
         - Format Output Strictly as:\n\
         {TITLE_MARKER} [Generated Title]\n\
         {DESCRIPTION_MARKER} [Generated Description]"
    );
    CompletionRequest {
        model: settings.model.clone(),
        system: SYSTEM_PROMPT.to_string(),
        user,
        temperature: settings.temperature,
        max_tokens: settings.max_tokens,
    }
}

/// Split a reply on the `Title:` and `Description:` markers.
///
/// The title is the text between the markers and the description everything
/// after the second one. Both are trimmed of whitespace and markdown emphasis,
/// then cut to their character limits.
#[must_use]
pub fn parse_reply(raw: &str) -> ParsedReply {
    let malformed = || ParsedReply::Malformed { raw: raw.to_string() };

    let Some(title_at) = raw.find(TITLE_MARKER) else {
        return malformed();
    };
    let rest = &raw[title_at + TITLE_MARKER.len()..];
    let Some(description_at) = rest.find(DESCRIPTION_MARKER) else {
        return malformed();
    };

    let title = clean(&rest[..description_at]);
    let description = clean(&rest[description_at + DESCRIPTION_MARKER.len()..]);
    if title.is_empty() {
        return malformed();
    }

    ParsedReply::Listing(ListingCopy {
        title: truncate_chars(title, MAX_TITLE_CHARS),
        description: truncate_chars(description, MAX_DESCRIPTION_CHARS),
    })
}

fn clean(field: &str) -> &str {
    field.trim_matches(|c: char| c.is_whitespace() || c == '*')
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Produces listing copy through a pluggable text backend.
pub struct ContentGenerator<'a> {
    completer: &'a dyn TextCompleter,
    settings: GenerationSettings,
}

impl<'a> ContentGenerator<'a> {
    /// Create a generator over the given completer.
    #[must_use]
    pub fn new(completer: &'a dyn TextCompleter, settings: GenerationSettings) -> Self {
        Self { completer, settings }
    }

    /// Generate a title and description for `product_name`.
    ///
    /// # Errors
    ///
    /// Returns the completer's error (missing key, upstream failure) or
    /// [`AppError::MalformedReply`] when the reply lacks either marker.
    pub async fn generate(&self, product_name: &str) -> Result<ListingCopy, AppError> {
        let request = build_request(product_name, &self.settings);
        let response = self.completer.complete(&request).await?;

        match parse_reply(&response.text) {
            ParsedReply::Listing(copy) => {
                debug!(title_chars = copy.title.chars().count(), "parsed listing copy");
                Ok(copy)
            }
            ParsedReply::Malformed { raw } => {
                warn!(reply = %raw, "completion did not match the Title/Description format");
                Err(AppError::MalformedReply { raw })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::ports::text_completer::{CompleteFuture, CompletionResponse};

    /// Completer that returns a canned reply and remembers the request.
    struct CannedCompleter {
        reply: Result<String, u16>,
        seen: Mutex<Option<CompletionRequest>>,
    }

    impl CannedCompleter {
        fn replying(text: &str) -> Self {
            Self { reply: Ok(text.to_string()), seen: Mutex::new(None) }
        }

        fn failing(status: u16) -> Self {
            Self { reply: Err(status), seen: Mutex::new(None) }
        }
    }

    impl TextCompleter for CannedCompleter {
        fn complete(&self, request: &CompletionRequest) -> CompleteFuture<'_> {
            *self.seen.lock().unwrap() = Some(request.clone());
            let reply = self.reply.clone();
            Box::pin(async move {
                reply.map(|text| CompletionResponse { text }).map_err(|status| AppError::Api {
                    status,
                    message: "{\"error\":\"rate limited\"}".into(),
                })
            })
        }
    }

    fn settings() -> GenerationSettings {
        GenerationSettings { model: "deepseek-chat".into(), temperature: 0.7, max_tokens: 600 }
    }

    #[test]
    fn parses_two_line_reply() {
        let reply = "Title: Organic Hass Avocado 200g\nDescription: Creamy, ripe and ready to eat.";
        assert_eq!(
            parse_reply(reply),
            ParsedReply::Listing(ListingCopy {
                title: "Organic Hass Avocado 200g".into(),
                description: "Creamy, ripe and ready to eat.".into(),
            })
        );
    }

    #[test]
    fn strips_markdown_emphasis() {
        let reply = "Sure!\n**Title:** Fresh Avocado\n**Description:** Great on toast.";
        let ParsedReply::Listing(copy) = parse_reply(reply) else {
            panic!("expected listing");
        };
        assert_eq!(copy.title, "Fresh Avocado");
        assert_eq!(copy.description, "Great on toast.");
    }

    #[test]
    fn multi_line_description_is_kept() {
        let reply = "Title: Avocado\nDescription: Line one.\nLine two.";
        let ParsedReply::Listing(copy) = parse_reply(reply) else {
            panic!("expected listing");
        };
        assert_eq!(copy.description, "Line one.\nLine two.");
    }

    #[test]
    fn long_fields_are_truncated() {
        let reply = format!("Title: {}\nDescription: {}", "t".repeat(300), "d".repeat(2000));
        let ParsedReply::Listing(copy) = parse_reply(&reply) else {
            panic!("expected listing");
        };
        assert_eq!(copy.title.chars().count(), MAX_TITLE_CHARS);
        assert_eq!(copy.description.chars().count(), MAX_DESCRIPTION_CHARS);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let reply = format!("Title: {}\nDescription: ok", "é".repeat(200));
        let ParsedReply::Listing(copy) = parse_reply(&reply) else {
            panic!("expected listing");
        };
        assert_eq!(copy.title.chars().count(), MAX_TITLE_CHARS);
    }

    #[test]
    fn missing_markers_are_malformed() {
        let raw = "Here is a lovely avocado for you.";
        assert_eq!(parse_reply(raw), ParsedReply::Malformed { raw: raw.into() });
    }

    #[test]
    fn missing_description_is_malformed() {
        assert!(matches!(parse_reply("Title: Avocado"), ParsedReply::Malformed { .. }));
    }

    #[test]
    fn description_before_title_is_malformed() {
        let raw = "Description: Creamy.\nTitle: Avocado";
        assert!(matches!(parse_reply(raw), ParsedReply::Malformed { .. }));
    }

    #[test]
    fn empty_title_is_malformed() {
        assert!(matches!(
            parse_reply("Title:   \nDescription: Something"),
            ParsedReply::Malformed { .. }
        ));
    }

    #[test]
    fn request_embeds_product_and_settings() {
        let request = build_request("Organic Avocado 200g", &settings());
        assert_eq!(request.model, "deepseek-chat");
        assert_eq!(request.max_tokens, 600);
        assert!(request.user.contains("for the product: Organic Avocado 200g."));
        assert!(request.user.contains("Title: [Generated Title]"));
        assert!(request.user.contains("Description: [Generated Description]"));
        assert!(request.system.contains("e-commerce SEO"));
    }

    #[tokio::test]
    async fn generate_returns_parsed_copy() {
        let completer = CannedCompleter::replying("Title: Avocado\nDescription: Creamy.");
        let generator = ContentGenerator::new(&completer, settings());
        let copy = generator.generate("Avocado").await.unwrap();
        assert_eq!(copy.title, "Avocado");
        let seen = completer.seen.lock().unwrap().clone().unwrap();
        assert!(seen.user.contains("Avocado"));
    }

    #[tokio::test]
    async fn generate_reports_malformed_reply() {
        let completer = CannedCompleter::replying("no markers here");
        let generator = ContentGenerator::new(&completer, settings());
        let err = generator.generate("Avocado").await.unwrap_err();
        assert!(matches!(err, AppError::MalformedReply { ref raw } if raw == "no markers here"));
        assert!(!err.to_string().contains("no markers here"));
    }

    #[tokio::test]
    async fn generate_passes_upstream_error_through() {
        let completer = CannedCompleter::failing(429);
        let generator = ContentGenerator::new(&completer, settings());
        let err = generator.generate("Avocado").await.unwrap_err();
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("rate limited"));
    }
}
