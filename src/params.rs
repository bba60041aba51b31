//! Validation of user-supplied inputs before any network call.

/// Lowest accepted sampling temperature.
const MIN_TEMPERATURE: f32 = 0.0;
/// Highest accepted sampling temperature.
const MAX_TEMPERATURE: f32 = 2.0;
/// Upper bound on the response-length ceiling.
const MAX_TOKENS_LIMIT: u32 = 8192;

/// Validate that a product name was supplied.
///
/// # Errors
///
/// Returns an error if the name is empty or whitespace only.
pub fn validate_product_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        Err("Please enter a product name".to_string())
    } else {
        Ok(())
    }
}

/// Validate that the image URL is an absolute `http` or `https` URL.
///
/// # Errors
///
/// Returns an error if the URL does not parse or uses another scheme.
pub fn validate_image_url(url: &str) -> Result<(), String> {
    let parsed =
        reqwest::Url::parse(url.trim()).map_err(|e| format!("Invalid image URL '{url}': {e}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("Unsupported URL scheme '{other}'. Use http or https")),
    }
}

/// Validate the sampling temperature.
///
/// # Errors
///
/// Returns an error if the temperature is outside `0.0..=2.0`.
pub fn validate_temperature(temperature: f32) -> Result<(), String> {
    if (MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&temperature) {
        Ok(())
    } else {
        Err(format!(
            "Unsupported temperature {temperature}. Valid: {MIN_TEMPERATURE}..={MAX_TEMPERATURE}"
        ))
    }
}

/// Validate the response-length ceiling.
///
/// # Errors
///
/// Returns an error if the value is zero or above the limit.
pub fn validate_max_tokens(max_tokens: u32) -> Result<(), String> {
    if (1..=MAX_TOKENS_LIMIT).contains(&max_tokens) {
        Ok(())
    } else {
        Err(format!("Unsupported max tokens {max_tokens}. Valid: 1..={MAX_TOKENS_LIMIT}"))
    }
}
