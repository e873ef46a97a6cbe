// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Configuration for the leadtime command line
//!
//! This module provides the parsed command line, its validation and the
//! logging level it selects.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use leadtime_git::walker::DEFAULT_MAX_DEPTH;
use leadtime_github::{RemoteError, RepoSlug, RetryPolicy};

/// Release lead time - how long merged pull requests wait for a release
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "leadtime")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Path to the local clone
    ///
    /// Any directory inside the repository works. Defaults to the current
    /// working directory.
    #[arg(short, long, env = "LEADTIME_REPO")]
    pub directory: Option<PathBuf>,

    /// Repository on GitHub, as a URL or `owner/repo`
    ///
    /// Enables remote mode. When omitted but a token is given, the `origin`
    /// remote of the local clone is used.
    #[arg(short = 'u', long, env = "LEADTIME_GITHUB_URL")]
    pub github_url: Option<String>,

    /// Override the REST API root (GitHub Enterprise proxies)
    #[arg(long, env = "LEADTIME_GITHUB_API")]
    pub api_base: Option<String>,

    /// GitHub access token
    #[arg(short, long, env = "LEADTIME_GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Previous release tag
    ///
    /// Defaults to the closest earlier semantic version tag with the same
    /// major version as the end tag.
    #[arg(short, long)]
    pub start_tag: Option<String>,

    /// Release tag to analyse
    #[arg(short, long)]
    pub end_tag: String,

    /// Analyse up to this many consecutive releases, ending at the end tag
    ///
    /// Each release is compared with the one before it. Stops early when no
    /// earlier release exists.
    #[arg(
        short,
        long,
        conflicts_with = "start_tag",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub limit: Option<u32>,

    /// How many merges deep incoming branches are followed
    #[arg(long)]
    pub depth: Option<usize>,

    /// Retries per GitHub request after the first attempt
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Use commit messages only, even when a token is available
    #[arg(long, default_value = "false")]
    pub local: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr so the report on stdout stays clean.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

/// Report formats
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

impl Config {
    /// Repository directory, using the current directory as default
    ///
    /// Returns `None` if no directory is given and the current directory
    /// cannot be determined.
    #[must_use]
    pub fn repo_path(&self) -> Option<PathBuf> {
        self.directory
            .clone()
            .or_else(|| std::env::current_dir().ok())
    }

    /// Merge walk depth bound
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.depth.unwrap_or(DEFAULT_MAX_DEPTH)
    }

    /// Retry policy for GitHub requests
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        let mut policy = RetryPolicy::default();
        if let Some(max_retries) = self.max_retries {
            policy.max_retries = max_retries;
        }
        policy
    }

    /// Per-request timeout, if overridden
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }

    /// Token, unless blank
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// Repository named by `--github-url`, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the value is neither `owner/repo` nor a remote URL.
    pub fn github_slug(&self) -> Result<Option<RepoSlug>, ConfigError> {
        self.github_url
            .as_deref()
            .map(|url| {
                url.parse::<RepoSlug>()
                    .map_err(|e| ConfigError::InvalidGitHubUrl(url.to_string(), e))
            })
            .transpose()
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The end tag is blank, or equal to the start tag
    /// - The directory is specified but doesn't exist or isn't a directory
    /// - The GitHub URL or API root cannot be parsed
    /// - The timeout is zero
    /// - The release limit is zero or combined with a start tag
    pub fn validate(&self) -> Result<(), ConfigError> {
        let end_tag = self.end_tag.trim();
        if end_tag.is_empty() {
            return Err(ConfigError::MissingEndTag);
        }
        if let Some(start_tag) = &self.start_tag {
            if start_tag.trim().is_empty() {
                return Err(ConfigError::BlankStartTag);
            }
            if start_tag.trim() == end_tag {
                return Err(ConfigError::SameTags(end_tag.to_string()));
            }
        }

        if let Some(ref directory) = self.directory {
            if !directory.exists() {
                return Err(ConfigError::RepoNotFound(directory.clone()));
            }
            if !directory.is_dir() {
                return Err(ConfigError::RepoNotDirectory(directory.clone()));
            }
        }

        self.github_slug()?;

        if let Some(ref api_base) = self.api_base
            && !(api_base.starts_with("https://") || api_base.starts_with("http://"))
        {
            return Err(ConfigError::InvalidApiBase(api_base.clone()));
        }

        if self.timeout == Some(0) {
            return Err(ConfigError::ZeroTimeout);
        }

        if self.limit == Some(0) || (self.limit.is_some() && self.start_tag.is_some()) {
            return Err(ConfigError::InvalidLimit);
        }

        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// End tag is blank
    #[error("An end tag is required")]
    MissingEndTag,

    /// Start tag is given but blank
    #[error("The start tag must not be blank")]
    BlankStartTag,

    /// Start and end tag are the same
    #[error("Start and end tag are both {0}")]
    SameTags(String),

    /// Repository path not found
    #[error("Repository path not found: {0}")]
    RepoNotFound(PathBuf),

    /// Repository path is not a directory
    #[error("Repository path is not a directory: {0}")]
    RepoNotDirectory(PathBuf),

    /// GitHub URL could not be parsed
    #[error("Invalid GitHub URL {0}: {1}")]
    InvalidGitHubUrl(String, RemoteError),

    /// API root is not an HTTP URL
    #[error("Invalid GitHub API root (expected an http(s) URL): {0}")]
    InvalidApiBase(String),

    /// Timeout of zero seconds
    #[error("The request timeout must be at least one second")]
    ZeroTimeout,

    /// Release limit given together with a start tag, or set to zero
    #[error("--limit must be at least 1 and cannot be combined with --start-tag")]
    InvalidLimit,
}
