//! Listingkit - marketplace copy and normalized product photos.

mod adapters;
mod cassette;
mod cli;
mod config;
mod content;
mod context;
mod error;
mod model;
mod normalize;
mod output;
mod params;
mod pipeline;
mod ports;

use std::path::Path;
use std::process;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::Config;
use crate::content::GenerationSettings;
use crate::context::ServiceContext;
use crate::error::AppError;
use crate::model::{detect_backend, resolve_model};
use crate::output::{render_copy, render_errors, render_json, save_outcome_image};
use crate::params::{
    validate_image_url, validate_max_tokens, validate_product_name, validate_temperature,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "listingkit=debug" } else { "listingkit=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn run(cli: Cli) -> Result<(), AppError> {
    // Load config
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(AppError::Config)?;
    let resolved = cli.resolve(&config.defaults);

    // Validate inputs
    validate_product_name(&cli.product_name).map_err(AppError::InvalidArgument)?;
    validate_image_url(&cli.image_url).map_err(AppError::InvalidArgument)?;
    validate_temperature(resolved.temperature).map_err(AppError::InvalidArgument)?;
    validate_max_tokens(resolved.max_tokens).map_err(AppError::InvalidArgument)?;

    // Resolve model and backend
    let model = resolve_model(&resolved.model);
    let backend = detect_backend(&model).map_err(AppError::InvalidArgument)?;
    debug!(model = %model, resolved_from = %resolved.model, ?backend, "text backend");

    // Create context based on mode (live / recording / replaying)
    let replay_path = std::env::var("LISTINGKIT_REPLAY").ok();
    let is_recording = std::env::var("LISTINGKIT_REC").is_ok_and(|v| v == "true" || v == "1");

    let (ctx, recording_session) = if let Some(ref cassette_path) = replay_path {
        debug!(cassette = %cassette_path, "replaying");
        (ServiceContext::replaying(Path::new(cassette_path))?, None)
    } else if is_recording {
        debug!("recording mode enabled");
        let (ctx, session) = ServiceContext::recording(backend, &config);
        (ctx, Some(session))
    } else {
        (ServiceContext::live(backend, &config), None)
    };

    let settings = GenerationSettings {
        model,
        temperature: resolved.temperature,
        max_tokens: resolved.max_tokens,
    };
    let mut outcome =
        pipeline::process(&ctx, settings, cli.product_name.trim(), cli.image_url.trim()).await;
    drop(ctx);

    // Save image
    let saved_to = save_outcome_image(&mut outcome, Path::new(&resolved.output));

    // Report
    if cli.json {
        println!("{}", render_json(&outcome, saved_to.as_deref())?);
    } else {
        let copy = render_copy(&outcome);
        if !copy.is_empty() {
            println!("{copy}");
        }
        if let Some(path) = &saved_to {
            eprintln!("Saved: {}", path.display());
        }
        for line in render_errors(&outcome) {
            eprintln!("{line}");
        }
    }

    // Finish recording if active
    if let Some(session) = recording_session {
        match session.finish() {
            Ok(path) => eprintln!("Cassette saved: {}", path.display()),
            Err(e) => eprintln!("Warning: failed to save cassette: {e}"),
        }
    }

    match outcome.failed_steps() {
        0 => Ok(()),
        failed => Err(AppError::Incomplete { failed }),
    }
}
