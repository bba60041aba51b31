//! CLI argument parsing with clap.

use clap::Parser;

use crate::config::DefaultsConfig;

/// Product listing CLI - marketplace copy and normalized product photos.
#[derive(Parser, Debug)]
#[command(name = "listingkit", version, about)]
pub struct Cli {
    /// Product name to write copy for.
    pub product_name: String,

    /// URL of the product photo.
    pub image_url: String,

    /// Text model name or short alias (default from config, else `deepseek`).
    #[arg(short, long)]
    pub model: Option<String>,

    /// Sampling temperature, 0.0 to 2.0.
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Response-length ceiling in tokens.
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Output path for the normalized photo (default `formatted_product.jpg`).
    #[arg(short, long)]
    pub output: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Flag values after config defaults have been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// Model name or alias.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Response-length ceiling.
    pub max_tokens: u32,
    /// Output path.
    pub output: String,
}

impl Cli {
    /// Fill unset flags from the config file defaults.
    #[must_use]
    pub fn resolve(&self, defaults: &DefaultsConfig) -> Resolved {
        Resolved {
            model: self.model.clone().unwrap_or_else(|| defaults.model.clone()),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            output: self.output.clone().unwrap_or_else(|| defaults.output.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_arguments() {
        let cli = Cli::parse_from(["listingkit", "Organic Avocado 200g", "https://e.com/a.jpg"]);
        assert_eq!(cli.product_name, "Organic Avocado 200g");
        assert_eq!(cli.image_url, "https://e.com/a.jpg");
        assert!(!cli.json);
        assert!(!cli.verbose);
    }

    #[test]
    fn defaults_come_from_config() {
        let cli = Cli::parse_from(["listingkit", "Avocado", "https://e.com/a.jpg"]);
        let resolved = cli.resolve(&DefaultsConfig::default());
        assert_eq!(
            resolved,
            Resolved {
                model: "deepseek".into(),
                temperature: 0.7,
                max_tokens: 600,
                output: "formatted_product.jpg".into(),
            }
        );
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "listingkit",
            "-m",
            "gpt-mini",
            "-t",
            "0.2",
            "--max-tokens",
            "300",
            "-o",
            "out.jpg",
            "--json",
            "-v",
            "Avocado",
            "https://e.com/a.jpg",
        ]);
        let resolved = cli.resolve(&DefaultsConfig::default());
        assert_eq!(resolved.model, "gpt-mini");
        assert!((resolved.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(resolved.max_tokens, 300);
        assert_eq!(resolved.output, "out.jpg");
        assert!(cli.json);
        assert!(cli.verbose);
    }

    #[test]
    fn missing_url_is_rejected() {
        assert!(Cli::try_parse_from(["listingkit", "Avocado"]).is_err());
    }
}
