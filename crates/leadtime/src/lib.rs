// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! leadtime library
//!
//! This module exports the command line configuration, report rendering and
//! the top-level [`run`] entry point for use in integration tests and as a
//! library. [`analyze`] covers one release interval; [`analyze_releases`]
//! walks back through consecutive releases.

pub mod config;
pub mod report;

use anyhow::{Context, Result, anyhow};
use leadtime_core::{ReleaseAnalysis, ResolveOptions, analyze_interval};
use leadtime_git::{GitRepo, WalkOptions, tags};
use leadtime_github::{GitHubClient, ReleaseApi, RepoSlug};
use tracing::{debug, info, warn};

use crate::config::Config;

/// Run the configured analyses and return the rendered report
///
/// With `--limit` every analysed release is rendered, newest first.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the repository cannot
/// be opened, no previous release can be found, the analysis hits a fatal
/// failure, or rendering fails.
pub fn run(config: &Config) -> Result<String> {
    let rendered = if config.limit.is_some() {
        report::render_all(&analyze_releases(config)?, config.format)
    } else {
        report::render(&analyze(config)?, config.format)
    };
    rendered.context("Failed to render report")
}

/// Run one analysis
///
/// # Errors
///
/// See [`run`].
pub fn analyze(config: &Config) -> Result<ReleaseAnalysis> {
    let session = Session::open(config)?;
    let end_tag = config.end_tag.trim();
    let start_tag = match config.start_tag.as_deref().map(str::trim) {
        Some(tag) => tag.to_string(),
        None => {
            info!(end_tag, "No start tag given, locating the previous release");
            session
                .repo
                .previous_release_tag(end_tag)
                .context("Failed to list release tags")?
                .ok_or_else(|| no_previous_release(end_tag))?
        }
    };

    session.analyze(&start_tag, end_tag)
}

/// Analyse up to `--limit` consecutive releases ending at `--end-tag`
///
/// Each release is paired with the closest earlier release of the same major
/// version. The walk stops early when a release has no predecessor; only the
/// end tag itself must have one.
///
/// # Errors
///
/// See [`run`].
pub fn analyze_releases(config: &Config) -> Result<Vec<ReleaseAnalysis>> {
    let session = Session::open(config)?;
    let limit = config.limit.unwrap_or(1) as usize;
    let names = session
        .repo
        .tag_names()
        .context("Failed to list release tags")?;

    let mut analyses = Vec::with_capacity(limit);
    let mut current = config.end_tag.trim().to_string();
    while analyses.len() < limit {
        let Some(previous) = tags::previous_release(&names, &current) else {
            if analyses.is_empty() {
                return Err(no_previous_release(&current));
            }
            info!(
                release = %current,
                analysed = analyses.len(),
                limit,
                "No earlier release, stopping"
            );
            break;
        };
        info!(
            release = %current,
            previous = %previous,
            index = analyses.len() + 1,
            limit,
            "Analysing release"
        );
        analyses.push(session.analyze(&previous, &current)?);
        current = previous;
    }

    Ok(analyses)
}

fn no_previous_release(tag: &str) -> anyhow::Error {
    anyhow!("No release tag precedes {tag}; pass --start-tag explicitly")
}

/// Repository, client and options shared by every analysed interval
struct Session {
    repo: GitRepo,
    client: Option<GitHubClient>,
    options: ResolveOptions,
}

impl Session {
    fn open(config: &Config) -> Result<Self> {
        config.validate()?;

        let path = config
            .repo_path()
            .context("No repository directory given and the current directory is unavailable")?;
        let repo = GitRepo::discover(&path)
            .with_context(|| format!("Failed to open git repository at {}", path.display()))?;
        let client = build_client(config, &repo)?;
        let options = ResolveOptions::default()
            .with_walk(WalkOptions::default().with_max_depth(config.max_depth()));

        Ok(Self {
            repo,
            client,
            options,
        })
    }

    fn analyze(&self, start_tag: &str, end_tag: &str) -> Result<ReleaseAnalysis> {
        analyze_interval(
            &self.repo,
            start_tag,
            end_tag,
            self.client.as_ref().map(|c| c as &dyn ReleaseApi),
            &self.options,
        )
        .with_context(|| format!("Failed to analyse release {start_tag}..{end_tag}"))
    }
}

/// GitHub client for remote mode, or `None` for local mode
///
/// An explicit `--github-url` always selects remote mode. Otherwise a token
/// selects remote mode against the `origin` remote when it parses as a
/// GitHub repository.
fn build_client(config: &Config, repo: &GitRepo) -> Result<Option<GitHubClient>> {
    if config.local {
        debug!("Local mode requested");
        return Ok(None);
    }

    let slug = match config.github_slug()? {
        Some(slug) => Some(slug),
        None if config.token().is_some() => origin_slug(repo),
        None => None,
    };
    let Some(slug) = slug else {
        info!("No GitHub repository configured, using commit messages only");
        return Ok(None);
    };

    if config.token().is_none() {
        warn!(repository = %slug, "No GitHub token given, unauthenticated requests have a low quota");
    }

    let mut client = GitHubClient::new(slug, config.token().map(str::to_string))
        .with_retry_policy(config.retry_policy());
    if let Some(api_base) = &config.api_base {
        client = client.with_api_base(api_base.as_str());
    }
    if let Some(timeout) = config.request_timeout() {
        client = client.with_timeout(timeout);
    }

    info!(
        repository = %client.slug(),
        api_base = client.api_base(),
        authenticated = client.is_authenticated(),
        "Using GitHub for pull request data"
    );
    Ok(Some(client))
}

fn origin_slug(repo: &GitRepo) -> Option<RepoSlug> {
    let url = repo.remote_url("origin")?;
    match RepoSlug::from_url(&url) {
        Ok(slug) => Some(slug),
        Err(e) => {
            warn!(url = %url, error = %e, "Remote origin is not a GitHub repository, falling back to commit messages");
            None
        }
    }
}
