// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Pull request model

use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use leadtime_git::PrCandidate;
use leadtime_github::PullRequestDetail;
use serde::{Deserialize, Serialize};

/// Where a pull request's data came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrSource {
    /// Recovered from commit messages in the local repository
    Local,
    /// Reported by the hosting service
    Remote,
}

impl PrSource {
    /// Lowercase name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

/// A pull request delivered by a release
///
/// Equality and hashing use only [`PullRequest::number`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Author login (remote) or commit author name (local)
    pub author: String,
    /// Title, or the commit subject for local PRs
    pub title: String,
    /// Description
    pub body: Option<String>,
    /// When the PR was opened
    pub created_at: Option<DateTime<Utc>>,
    /// When the PR was merged
    pub merged_at: Option<DateTime<Utc>>,
    /// Branch merged into
    pub target_branch: Option<String>,
    /// Branch merged from
    pub source_branch: Option<String>,
    /// Commit that landed the PR
    pub merge_commit_sha: Option<String>,
    /// Lines added
    pub additions: u64,
    /// Lines deleted
    pub deletions: u64,
    /// Files changed
    pub changed_files: u64,
    /// Data source
    pub source: PrSource,
    /// Date of the release that shipped the PR
    pub release_date: Option<DateTime<Utc>>,
}

impl PullRequest {
    /// Build from hosting service data
    #[must_use]
    pub fn from_remote(detail: PullRequestDetail) -> Self {
        let author = detail.author().to_string();
        let target_branch = detail.target_branch().map(str::to_string);
        let source_branch = detail.source_branch().map(str::to_string);

        Self {
            number: detail.number,
            author,
            title: detail.title,
            body: detail.body.filter(|b| !b.trim().is_empty()),
            created_at: detail.created_at,
            merged_at: detail.merged_at,
            target_branch,
            source_branch,
            merge_commit_sha: detail.merge_commit_sha,
            additions: detail.additions.unwrap_or(0),
            deletions: detail.deletions.unwrap_or(0),
            changed_files: detail.changed_files.unwrap_or(0),
            source: PrSource::Remote,
            release_date: None,
        }
    }

    /// Build from a commit message reference
    ///
    /// The commit time stands in for the merge time; line counts are unknown.
    #[must_use]
    pub fn from_candidate(candidate: &PrCandidate) -> Self {
        let commit = &candidate.commit;
        Self {
            number: candidate.number,
            author: commit.author.clone(),
            title: commit.subject().to_string(),
            body: None,
            created_at: None,
            merged_at: Some(commit.committed_at),
            target_branch: None,
            source_branch: candidate.source_branch.clone(),
            merge_commit_sha: Some(commit.sha.clone()),
            additions: 0,
            deletions: 0,
            changed_files: 0,
            source: PrSource::Local,
            release_date: None,
        }
    }

    /// Hours from merge to release, `0.0` when either date is unknown
    ///
    /// A merge recorded after the release date also yields `0.0`.
    #[must_use]
    pub fn lead_time_hours(&self) -> f64 {
        match (self.release_date, self.merged_at) {
            (Some(release), Some(merged)) => {
                let seconds = (release - merged).num_seconds();
                (seconds as f64 / 3600.0).max(0.0)
            }
            _ => 0.0,
        }
    }

    /// Additions plus deletions
    #[must_use]
    pub fn total_changes(&self) -> u64 {
        self.additions + self.deletions
    }

    /// Record the release date
    pub fn set_release_date(&mut self, date: DateTime<Utc>) {
        self.release_date = Some(date);
    }
}

impl PartialEq for PullRequest {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
    }
}

impl Eq for PullRequest {}

impl Hash for PullRequest {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.number.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use leadtime_git::CommitRef;
    use leadtime_github::types::{BranchRef, UserRef};
    use similar_asserts::assert_eq;
    use std::collections::HashSet;

    fn detail(number: u64) -> PullRequestDetail {
        PullRequestDetail {
            number,
            title: format!("PR {number}"),
            body: Some("  ".into()),
            user: Some(UserRef {
                login: "ada".into(),
            }),
            state: "closed".into(),
            merged: Some(true),
            created_at: None,
            merged_at: Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()),
            base: Some(BranchRef {
                name: "main".into(),
            }),
            head: Some(BranchRef {
                name: "feature".into(),
            }),
            merge_commit_sha: Some("abc".into()),
            additions: Some(10),
            deletions: Some(4),
            changed_files: Some(2),
        }
    }

    #[test]
    fn test_from_remote() {
        let pr = PullRequest::from_remote(detail(5));
        assert_eq!(pr.number, 5);
        assert_eq!(pr.author, "ada");
        assert_eq!(pr.body, None);
        assert_eq!(pr.target_branch.as_deref(), Some("main"));
        assert_eq!(pr.source_branch.as_deref(), Some("feature"));
        assert_eq!(pr.total_changes(), 14);
        assert_eq!(pr.changed_files, 2);
        assert_eq!(pr.source, PrSource::Remote);
    }

    #[test]
    fn test_from_candidate_uses_commit_time() {
        let committed_at = Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap();
        let candidate = PrCandidate {
            number: 12,
            source_branch: Some("acme/parser".into()),
            commit: CommitRef {
                sha: "a".repeat(40),
                parents: vec!["b".repeat(40), "c".repeat(40)],
                author: "Ada".into(),
                author_email: "ada@example.com".into(),
                authored_at: committed_at,
                committed_at,
                message: "Merge pull request #12 from acme/parser\n\nAdd parser".into(),
            },
        };

        let pr = PullRequest::from_candidate(&candidate);
        assert_eq!(pr.merged_at, Some(committed_at));
        assert_eq!(pr.title, "Merge pull request #12 from acme/parser");
        assert_eq!(pr.merge_commit_sha, Some("a".repeat(40)));
        assert_eq!(pr.source, PrSource::Local);
    }

    #[test]
    fn test_lead_time_hours() {
        let mut pr = PullRequest::from_remote(detail(1));
        assert_eq!(pr.lead_time_hours(), 0.0);

        let merged = pr.merged_at.unwrap();
        pr.set_release_date(merged + Duration::minutes(90));
        assert_eq!(pr.lead_time_hours(), 1.5);

        pr.merged_at = None;
        assert_eq!(pr.lead_time_hours(), 0.0);
    }

    #[test]
    fn test_merge_after_release_is_zero() {
        let mut pr = PullRequest::from_remote(detail(1));
        let merged = pr.merged_at.unwrap();
        pr.set_release_date(merged - Duration::hours(2));
        assert_eq!(pr.lead_time_hours(), 0.0);
    }

    #[test]
    fn test_identity_is_number() {
        let a = PullRequest::from_remote(detail(42));
        let mut b = PullRequest::from_remote(detail(42));
        b.title = "Different".into();

        assert_eq!(a, b);
        let set: HashSet<PullRequest> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }
}
