// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Remote release operations
//!
//! [`ReleaseApi`] is the seam between interval resolution and the hosting
//! service, so resolution logic can be exercised against an in-memory fake.

use crate::error::RemoteError;
use crate::types::{CommitSummary, PullRequestDetail, RateLimitStatus};

/// Operations the release resolver needs from a hosting service
pub trait ReleaseApi: Send + Sync {
    /// Current API quota
    fn check_rate_limit(&self) -> Result<RateLimitStatus, RemoteError>;

    /// Commit SHA a tag points at, peeling annotated tags
    fn resolve_tag(&self, name: &str) -> Result<String, RemoteError>;

    /// Commits reachable from `head` but not from `base`, oldest first
    fn compare_refs(&self, base: &str, head: &str) -> Result<Vec<CommitSummary>, RemoteError>;

    /// A single commit
    fn get_commit(&self, sha: &str) -> Result<CommitSummary, RemoteError>;

    /// A single pull request with line counts
    fn get_pull_request(&self, number: u64) -> Result<PullRequestDetail, RemoteError>;

    /// Pull requests associated with a commit
    ///
    /// An empty list means the service knows of none, not an error.
    fn get_pull_requests_for_commit(&self, sha: &str) -> Result<Vec<PullRequestDetail>, RemoteError>;
}
