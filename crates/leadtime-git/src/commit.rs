//! Commit and release tag types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A commit read from the object store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRef {
    /// The commit SHA (40 hex characters)
    pub sha: String,
    /// Parent commit SHAs, first parent first
    pub parents: Vec<String>,
    /// Author name
    pub author: String,
    /// Author email
    pub author_email: String,
    /// Author timestamp
    pub authored_at: DateTime<Utc>,
    /// Committer timestamp (when the commit landed on its branch)
    pub committed_at: DateTime<Utc>,
    /// Full commit message
    pub message: String,
}

impl CommitRef {
    /// Validate that a SHA is a valid 40-character hex string
    #[must_use]
    pub fn is_valid_sha(sha: &str) -> bool {
        sha.len() == 40 && sha.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Get the short SHA (first 7 characters)
    #[must_use]
    pub fn short_sha(&self) -> &str {
        &self.sha[..7.min(self.sha.len())]
    }

    /// Check if this is a merge commit (has multiple parents)
    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// Check if this is a root commit (has no parents)
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Mainline parent, if any
    #[must_use]
    pub fn first_parent(&self) -> Option<&str> {
        self.parents.first().map(String::as_str)
    }

    /// Get the first line of the commit message (subject)
    #[must_use]
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

/// A release tag peeled to the commit it marks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseTag {
    /// Tag name as given by the caller (e.g. `v1.2.0`)
    pub name: String,
    /// The commit the tag resolves to
    pub commit: CommitRef,
    /// Release date, taken from the commit's committer timestamp
    pub date: DateTime<Utc>,
    /// Whether the tag is an annotated tag object
    pub annotated: bool,
}

impl ReleaseTag {
    /// Build a release tag from a resolved commit
    #[must_use]
    pub fn new(name: impl Into<String>, commit: CommitRef, annotated: bool) -> Self {
        let date = commit.committed_at;
        Self {
            name: name.into(),
            commit,
            date,
            annotated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use similar_asserts::assert_eq;

    fn sample_commit() -> CommitRef {
        CommitRef {
            sha: "1945ab9c752534e733c38ba0109dc3b741f0a6eb".to_string(),
            parents: vec!["c460aeb7fb2d109c17e43de0ce681faec0b7374d".to_string()],
            author: "Test Author".to_string(),
            author_email: "test@example.com".to_string(),
            authored_at: Utc.with_ymd_and_hms(2026, 1, 17, 2, 0, 0).unwrap(),
            committed_at: Utc.with_ymd_and_hms(2026, 1, 17, 2, 33, 6).unwrap(),
            message: "Merge pull request #12 from acme/feature\n\nAdd feature.".to_string(),
        }
    }

    #[test]
    fn test_commit_serialization_roundtrip() {
        let commit = sample_commit();
        let json = serde_json::to_string(&commit).expect("serialize");
        let deserialized: CommitRef = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(commit, deserialized);
    }

    #[test]
    fn test_is_valid_sha() {
        assert!(CommitRef::is_valid_sha(
            "1945ab9c752534e733c38ba0109dc3b741f0a6eb"
        ));
        assert!(CommitRef::is_valid_sha(
            "ABCDEF1234567890abcdef1234567890abcdef12"
        ));
        assert!(!CommitRef::is_valid_sha("1945ab9"));
        assert!(!CommitRef::is_valid_sha(
            "1945ab9c752534e733c38ba0109dc3b741f0a6eg"
        ));
        assert!(!CommitRef::is_valid_sha(""));
    }

    #[test]
    fn test_short_sha() {
        let commit = sample_commit();
        assert_eq!(commit.short_sha(), "1945ab9");
    }

    #[test]
    fn test_short_sha_handles_short_input() {
        let mut commit = sample_commit();
        commit.sha = "abc".to_string();
        assert_eq!(commit.short_sha(), "abc");
    }

    #[test]
    fn test_merge_and_root_detection() {
        let mut commit = sample_commit();
        assert!(!commit.is_merge());
        assert!(!commit.is_root());

        commit.parents.push("b".repeat(40));
        assert!(commit.is_merge());
        assert_eq!(
            commit.first_parent(),
            Some("c460aeb7fb2d109c17e43de0ce681faec0b7374d")
        );

        commit.parents.clear();
        assert!(commit.is_root());
        assert_eq!(commit.first_parent(), None);
    }

    #[test]
    fn test_subject() {
        let mut commit = sample_commit();
        assert_eq!(commit.subject(), "Merge pull request #12 from acme/feature");
        commit.message = String::new();
        assert_eq!(commit.subject(), "");
    }

    #[test]
    fn test_release_tag_uses_committer_date() {
        let commit = sample_commit();
        let tag = ReleaseTag::new("v1.0.0", commit.clone(), true);
        assert_eq!(tag.date, commit.committed_at);
        assert_eq!(tag.name, "v1.0.0");
        assert!(tag.annotated);
    }
}
