// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! GitHub REST response types
//!
//! Only the fields the release analysis reads are modelled; everything else
//! in the payloads is ignored by serde.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Requests below this many remaining calls should trigger a warning
pub const DEFAULT_LOW_WATER_MARK: u64 = 100;

/// Core API quota
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitStatus {
    /// Requests per window, when reported
    pub limit: Option<u64>,
    /// Requests left in the current window
    pub remaining: u64,
    /// When the window resets
    pub reset_at: DateTime<Utc>,
}

impl RateLimitStatus {
    /// No requests left
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Fewer than `low_water_mark` requests left
    #[must_use]
    pub fn is_low(&self, low_water_mark: u64) -> bool {
        self.remaining < low_water_mark
    }

    /// Exhausted and the reset time has not passed yet
    #[must_use]
    pub fn blocks_at(&self, now: DateTime<Utc>) -> bool {
        self.is_exhausted() && self.reset_at > now
    }
}

/// `GET /rate_limit` body
#[derive(Debug, Deserialize)]
pub(crate) struct RateLimitResponse {
    pub resources: RateLimitResources,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RateLimitResources {
    pub core: RateLimitCore,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RateLimitCore {
    pub limit: Option<u64>,
    pub remaining: u64,
    pub reset: i64,
}

impl From<RateLimitCore> for RateLimitStatus {
    fn from(core: RateLimitCore) -> Self {
        Self {
            limit: core.limit,
            remaining: core.remaining,
            reset_at: DateTime::from_timestamp(core.reset, 0).unwrap_or_else(Utc::now),
        }
    }
}

/// A commit as reported by the compare and commit endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    /// Commit SHA
    pub sha: String,
    /// Parent SHAs, first parent first
    pub parents: Vec<String>,
    /// Full commit message
    pub message: String,
    /// Author name from the git metadata
    pub author: String,
    /// Committer date
    pub committed_at: Option<DateTime<Utc>>,
}

impl CommitSummary {
    /// Whether the commit has more than one parent
    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// First line of the message
    #[must_use]
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitPayload {
    pub sha: String,
    #[serde(default)]
    pub parents: Vec<ShaRef>,
    pub commit: GitCommitPayload,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ShaRef {
    pub sha: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GitCommitPayload {
    #[serde(default)]
    pub message: String,
    pub author: Option<GitActor>,
    pub committer: Option<GitActor>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GitActor {
    pub name: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl From<CommitPayload> for CommitSummary {
    fn from(payload: CommitPayload) -> Self {
        let author = payload
            .commit
            .author
            .as_ref()
            .and_then(|a| a.name.clone())
            .unwrap_or_else(|| "Unknown".to_string());
        let committed_at = payload
            .commit
            .committer
            .as_ref()
            .and_then(|c| c.date)
            .or_else(|| payload.commit.author.as_ref().and_then(|a| a.date));

        Self {
            sha: payload.sha,
            parents: payload.parents.into_iter().map(|p| p.sha).collect(),
            message: payload.commit.message,
            author,
            committed_at,
        }
    }
}

/// `GET /repos/{owner}/{repo}/compare/{base}...{head}` body
#[derive(Debug, Deserialize)]
pub(crate) struct CompareResponse {
    #[serde(default)]
    pub total_commits: usize,
    #[serde(default)]
    pub commits: Vec<CommitPayload>,
}

/// `GET /repos/{owner}/{repo}/git/ref/tags/{name}` and `git/tags/{sha}` bodies
#[derive(Debug, Deserialize)]
pub(crate) struct GitRefPayload {
    /// Full reference name; absent on tag objects
    #[serde(rename = "ref")]
    pub name: Option<String>,
    pub object: GitObjectPayload,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GitObjectPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub sha: String,
}

/// A user reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    /// Login name
    pub login: String,
}

/// A branch reference on a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRef {
    /// Branch name
    #[serde(rename = "ref")]
    pub name: String,
}

/// Pull request details
///
/// The commit-to-PR listing omits `merged` and the line counts, so those are
/// optional and [`PullRequestDetail::is_merged`] falls back to `merged_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestDetail {
    /// PR number
    pub number: u64,
    /// Title
    #[serde(default)]
    pub title: String,
    /// Description
    pub body: Option<String>,
    /// Author
    pub user: Option<UserRef>,
    /// `open` or `closed`
    #[serde(default)]
    pub state: String,
    /// Explicit merged flag (single-PR endpoint only)
    pub merged: Option<bool>,
    /// Creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Merge time
    pub merged_at: Option<DateTime<Utc>>,
    /// Target branch
    pub base: Option<BranchRef>,
    /// Source branch
    pub head: Option<BranchRef>,
    /// SHA of the merge, squash or rebase commit
    pub merge_commit_sha: Option<String>,
    /// Lines added
    pub additions: Option<u64>,
    /// Lines deleted
    pub deletions: Option<u64>,
    /// Files changed
    pub changed_files: Option<u64>,
}

impl PullRequestDetail {
    /// Whether the PR was merged
    #[must_use]
    pub fn is_merged(&self) -> bool {
        self.merged.unwrap_or(self.merged_at.is_some())
    }

    /// Author login, or `Unknown`
    #[must_use]
    pub fn author(&self) -> &str {
        self.user.as_ref().map_or("Unknown", |u| u.login.as_str())
    }

    /// Target branch name
    #[must_use]
    pub fn target_branch(&self) -> Option<&str> {
        self.base.as_ref().map(|b| b.name.as_str())
    }

    /// Source branch name
    #[must_use]
    pub fn source_branch(&self) -> Option<&str> {
        self.head.as_ref().map(|b| b.name.as_str())
    }

    /// Whether the line counts are present (listing payloads omit them)
    #[must_use]
    pub fn has_line_counts(&self) -> bool {
        self.additions.is_some() && self.deletions.is_some()
    }
}
