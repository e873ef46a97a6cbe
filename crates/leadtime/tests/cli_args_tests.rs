// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! CLI tests for argument parsing
//!
//! These tests verify flag spellings, defaults and the interaction of the
//! logging flags.

use clap::Parser;
use leadtime::config::{Config, OutputFormat};
use std::path::PathBuf;
use tracing::Level;

// ============================================================================
// Required and tag flags
// ============================================================================

#[test]
fn test_end_tag_is_required() {
    let result = Config::try_parse_from(["leadtime"]);
    assert!(result.is_err());
    let err = result.unwrap_err().to_string();
    assert!(err.contains("--end-tag"), "Error should name the flag: {err}");
}

#[test]
fn test_short_tag_flags() {
    let config = Config::try_parse_from(["leadtime", "-s", "v1.0.0", "-e", "v1.1.0"])
        .expect("parse should succeed");
    assert_eq!(config.start_tag.as_deref(), Some("v1.0.0"));
    assert_eq!(config.end_tag, "v1.1.0");
}

#[test]
fn test_long_tag_flags() {
    let config = Config::try_parse_from([
        "leadtime",
        "--start-tag",
        "v2.0.0",
        "--end-tag",
        "v2.1.0",
    ])
    .expect("parse should succeed");
    assert_eq!(config.start_tag.as_deref(), Some("v2.0.0"));
    assert_eq!(config.end_tag, "v2.1.0");
}

#[test]
fn test_start_tag_is_optional() {
    let config = Config::try_parse_from(["leadtime", "-e", "v1.1.0"]).expect("parse should succeed");
    assert!(config.start_tag.is_none());
}

#[test]
fn test_limit_flag() {
    let config = Config::try_parse_from(["leadtime", "-e", "v1.1.0", "-l", "3"])
        .expect("parse should succeed");
    assert_eq!(config.limit, Some(3));

    let config = Config::try_parse_from(["leadtime", "-e", "v1.1.0", "--limit", "1"])
        .expect("parse should succeed");
    assert_eq!(config.limit, Some(1));

    let config = Config::try_parse_from(["leadtime", "-e", "v1.1.0"]).expect("parse should succeed");
    assert!(config.limit.is_none());
}

#[test]
fn test_limit_rejects_zero() {
    let result = Config::try_parse_from(["leadtime", "-e", "v1.1.0", "-l", "0"]);
    assert!(result.is_err());
}

#[test]
fn test_limit_conflicts_with_start_tag() {
    let result = Config::try_parse_from(["leadtime", "-s", "v1.0.0", "-e", "v1.1.0", "-l", "2"]);
    assert!(result.is_err());
    let err = result.unwrap_err().to_string();
    assert!(err.contains("--limit"), "Error should name the flag: {err}");
}

// ============================================================================
// Repository and remote flags
// ============================================================================

#[test]
fn test_directory_and_github_flags() {
    let config = Config::try_parse_from([
        "leadtime",
        "-e",
        "v1.1.0",
        "-d",
        "/srv/widgets",
        "-u",
        "acme/widgets",
        "-t",
        "secret",
        "--api-base",
        "https://ghe.example.com/api/v3",
    ])
    .expect("parse should succeed");

    assert_eq!(config.directory, Some(PathBuf::from("/srv/widgets")));
    assert_eq!(config.github_url.as_deref(), Some("acme/widgets"));
    assert_eq!(config.token(), Some("secret"));
    assert_eq!(
        config.api_base.as_deref(),
        Some("https://ghe.example.com/api/v3")
    );
}

#[test]
fn test_tuning_flags() {
    let config = Config::try_parse_from([
        "leadtime",
        "-e",
        "v1.1.0",
        "--depth",
        "5",
        "--max-retries",
        "0",
        "--timeout",
        "10",
        "--local",
    ])
    .expect("parse should succeed");

    assert_eq!(config.max_depth(), 5);
    assert_eq!(config.retry_policy().max_retries, 0);
    assert_eq!(
        config.request_timeout(),
        Some(std::time::Duration::from_secs(10))
    );
    assert!(config.local);
}

#[test]
fn test_depth_rejects_negative_values() {
    let result = Config::try_parse_from(["leadtime", "-e", "v1.1.0", "--depth", "-1"]);
    assert!(result.is_err());
}

// ============================================================================
// Output format
// ============================================================================

#[test]
fn test_format_defaults_to_text() {
    let config = Config::try_parse_from(["leadtime", "-e", "v1.1.0"]).expect("parse should succeed");
    assert_eq!(config.format, OutputFormat::Text);
}

#[test]
fn test_format_json() {
    let config = Config::try_parse_from(["leadtime", "-e", "v1.1.0", "--format", "json"])
        .expect("parse should succeed");
    assert_eq!(config.format, OutputFormat::Json);

    let config = Config::try_parse_from(["leadtime", "-e", "v1.1.0", "-f", "text"])
        .expect("parse should succeed");
    assert_eq!(config.format, OutputFormat::Text);
}

#[test]
fn test_format_rejects_unknown_value() {
    let result = Config::try_parse_from(["leadtime", "-e", "v1.1.0", "--format", "yaml"]);
    assert!(result.is_err());
}

// ============================================================================
// Logging flags
// ============================================================================

#[test]
fn test_verbose_short_flag_v() {
    let config =
        Config::try_parse_from(["leadtime", "-e", "v1.1.0", "-v"]).expect("parse should succeed");
    assert!(config.verbose);
    assert!(!config.quiet);
    assert_eq!(config.log_level(), Level::DEBUG);
}

#[test]
fn test_quiet_long_flag() {
    let config = Config::try_parse_from(["leadtime", "-e", "v1.1.0", "--quiet"])
        .expect("parse should succeed");
    assert!(config.quiet);
    assert_eq!(config.log_level(), Level::WARN);
}

#[test]
fn test_verbose_wins_over_quiet() {
    let config = Config::try_parse_from(["leadtime", "-e", "v1.1.0", "-v", "-q"])
        .expect("parse should succeed");
    assert_eq!(config.log_level(), Level::DEBUG);
}

#[test]
fn test_verbose_flag_value_syntax_not_supported() {
    // Boolean flags are toggled by presence only
    let result = Config::try_parse_from(["leadtime", "-e", "v1.1.0", "--verbose=true"]);
    assert!(result.is_err(), "Boolean flags don't support =value syntax");
}
