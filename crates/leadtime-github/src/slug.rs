// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Repository identification from remote URLs

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::RemoteError;

/// Public GitHub host
pub const GITHUB_HOST: &str = "github.com";

static REMOTE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:https?|ssh|git)://(?:[^@/]+@)?(?P<host>[^/:]+)(?::\d+)?/|[^@/]+@(?P<scp_host>[^:/]+):)(?P<owner>[^/]+)/(?P<name>[^/]+?)(?:\.git)?/?$",
    )
    .expect("valid remote URL regex")
});

/// A repository on a GitHub host
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSlug {
    /// Host name, e.g. `github.com` or an enterprise host
    pub host: String,
    /// Owner or organisation
    pub owner: String,
    /// Repository name without `.git`
    pub name: String,
}

impl RepoSlug {
    /// Create a slug on the given host
    pub fn new(host: impl Into<String>, owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse an HTTPS, `ssh://` or scp-style (`git@host:owner/repo`) remote URL
    pub fn from_url(url: &str) -> Result<Self, RemoteError> {
        let caps = REMOTE_URL
            .captures(url.trim())
            .ok_or_else(|| RemoteError::InvalidRepository(url.to_string()))?;

        let host = caps
            .name("host")
            .or_else(|| caps.name("scp_host"))
            .map(|m| m.as_str())
            .ok_or_else(|| RemoteError::InvalidRepository(url.to_string()))?;

        Ok(Self::new(host, &caps["owner"], &caps["name"]))
    }

    /// Whether this repository lives on public GitHub
    #[must_use]
    pub fn is_public_github(&self) -> bool {
        self.host.eq_ignore_ascii_case(GITHUB_HOST) || self.host.eq_ignore_ascii_case("www.github.com")
    }

    /// REST API root for the host
    ///
    /// Enterprise servers serve the API under `/api/v3`.
    #[must_use]
    pub fn api_base(&self) -> String {
        if self.is_public_github() {
            "https://api.github.com".to_string()
        } else {
            format!("https://{}/api/v3", self.host)
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoSlug {
    type Err = RemoteError;

    /// Accepts a remote URL or a bare `owner/repo` on public GitHub
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some((owner, name)) = trimmed.split_once('/')
            && !owner.is_empty()
            && !name.is_empty()
            && !name.contains('/')
            && !owner.contains(':')
            && !owner.contains('@')
        {
            return Ok(Self::new(GITHUB_HOST, owner, name.trim_end_matches(".git")));
        }
        Self::from_url(trimmed)
    }
}
