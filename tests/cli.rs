//! CLI argument parsing and validation tests — no network I/O.
//!
//! These tests verify that invalid inputs are rejected before any cassette
//! or live adapter is consulted.

use assert_cmd::Command;
use predicates::prelude::*;

const URL: &str = "https://example.com/avocado.jpg";

fn cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("listingkit");
    cmd.env("LISTINGKIT_CONFIG", "/nonexistent/listingkit.toml")
        .env_remove("LISTINGKIT_REPLAY")
        .env_remove("LISTINGKIT_REC");
    cmd
}

#[test]
fn missing_arguments_exit_with_usage() {
    cmd().assert().failure().stderr(predicate::str::contains("PRODUCT_NAME"));
    cmd().arg("Avocado").assert().failure().stderr(predicate::str::contains("IMAGE_URL"));
}

#[test]
fn blank_product_name_exits_with_error() {
    cmd()
        .args(["   ", URL])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a product name"));
}

#[test]
fn invalid_url_exits_with_error() {
    cmd()
        .args(["Avocado", "not-a-url"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid image URL"));
}

#[test]
fn invalid_model_exits_with_error() {
    // Model that doesn't start with "deepseek" or "gpt-" → detect_backend() rejects it
    cmd()
        .args(["--model", "claude-3", "Avocado", URL])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown backend for model"));
}

#[test]
fn invalid_temperature_exits_with_error() {
    cmd()
        .args(["--temperature", "3.5", "Avocado", URL])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported temperature"));
}

#[test]
fn invalid_max_tokens_exits_with_error() {
    cmd()
        .args(["--max-tokens", "0", "Avocado", URL])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported max tokens"));
}

#[test]
fn broken_config_exits_with_error() {
    let path = std::env::temp_dir().join("listingkit_cli_bad_config.toml");
    std::fs::write(&path, "defaults = [[[").unwrap();

    cmd()
        .env("LISTINGKIT_CONFIG", path.to_str().unwrap())
        .args(["Avocado", URL])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_cassette_exits_with_error() {
    cmd()
        .env("LISTINGKIT_REPLAY", "/nonexistent/session.cassette.yaml")
        .args(["Avocado", URL])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load cassette"));
}
