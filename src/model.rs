//! Text model name resolution and backend detection.

/// Supported text-completion backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// `DeepSeek` chat completions API.
    DeepSeek,
    /// `OpenAI` chat completions API.
    OpenAi,
}

impl Backend {
    /// Human-readable backend name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::DeepSeek => "DeepSeek",
            Self::OpenAi => "OpenAI",
        }
    }

    /// Environment variable holding the API key for this backend.
    #[must_use]
    pub fn env_var(self) -> &'static str {
        match self {
            Self::DeepSeek => "DEEPSEEK_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }

    /// Chat completions endpoint for this backend.
    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::DeepSeek => "https://api.deepseek.com/v1/chat/completions",
            Self::OpenAi => "https://api.openai.com/v1/chat/completions",
        }
    }
}

/// Short name aliases for text models.
const ALIASES: &[(&str, &str)] = &[
    ("deepseek", "deepseek-chat"),
    ("gpt", "gpt-4o"),
    ("gpt-mini", "gpt-4o-mini"),
];

/// Resolve a model name (alias or exact) to the full model identifier.
#[must_use]
pub fn resolve_model(name: &str) -> String {
    ALIASES
        .iter()
        .find(|&&(alias, _)| alias == name)
        .map_or_else(|| name.to_string(), |&(_, full)| full.to_string())
}

/// Detect the backend from a resolved model name.
///
/// # Errors
///
/// Returns an error if the model name doesn't match a known backend prefix.
pub fn detect_backend(model: &str) -> Result<Backend, String> {
    if model.starts_with("deepseek") {
        Ok(Backend::DeepSeek)
    } else if model.starts_with("gpt-") {
        Ok(Backend::OpenAi)
    } else {
        Err(format!("Unknown backend for model '{model}'. Expected 'deepseek-*' or 'gpt-*'."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_aliases() {
        assert_eq!(resolve_model("deepseek"), "deepseek-chat");
        assert_eq!(resolve_model("gpt"), "gpt-4o");
        assert_eq!(resolve_model("gpt-mini"), "gpt-4o-mini");
    }

    #[test]
    fn resolve_exact_name_passthrough() {
        assert_eq!(resolve_model("deepseek-reasoner"), "deepseek-reasoner");
        assert_eq!(resolve_model("gpt-4.1"), "gpt-4.1");
    }

    #[test]
    fn detect_deepseek_backend() {
        assert_eq!(detect_backend("deepseek-chat").unwrap(), Backend::DeepSeek);
        assert_eq!(detect_backend("deepseek-reasoner").unwrap(), Backend::DeepSeek);
    }

    #[test]
    fn detect_openai_backend() {
        assert_eq!(detect_backend("gpt-4o").unwrap(), Backend::OpenAi);
        assert_eq!(detect_backend("gpt-4o-mini").unwrap(), Backend::OpenAi);
    }

    #[test]
    fn detect_unknown_backend() {
        assert!(detect_backend("claude-3").is_err());
        assert!(detect_backend("gemini-pro").is_err());
    }

    #[test]
    fn backend_metadata() {
        assert_eq!(Backend::DeepSeek.env_var(), "DEEPSEEK_API_KEY");
        assert_eq!(Backend::OpenAi.env_var(), "OPENAI_API_KEY");
        assert!(Backend::DeepSeek.endpoint().starts_with("https://api.deepseek.com/"));
        assert!(Backend::OpenAi.endpoint().ends_with("/chat/completions"));
        assert_eq!(Backend::OpenAi.display_name(), "OpenAI");
    }
}
