// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! leadtime-github: GitHub REST access for release lead-time analysis
//!
//! This library crate talks to the GitHub (or GitHub Enterprise) REST API to
//! compare release ranges and map commits to the pull requests that delivered
//! them. Every call goes through a bounded retry policy with exponential
//! backoff; missing items surface as [`RemoteError::NotFound`] so callers can
//! skip them, while bad credentials abort immediately.
//!
//! # Example
//!
//! ```no_run
//! use leadtime_github::{GitHubClient, ReleaseApi, RepoSlug};
//!
//! let slug = RepoSlug::from_url("https://github.com/acme/widgets.git").expect("slug");
//! let client = GitHubClient::new(slug, std::env::var("LEADTIME_GITHUB_TOKEN").ok());
//!
//! let quota = client.check_rate_limit().expect("rate limit");
//! println!("{} requests left", quota.remaining);
//!
//! for commit in client.compare_refs("v1.0.0", "v1.1.0").expect("compare") {
//!     println!("{} {}", commit.sha, commit.subject());
//! }
//! ```

#![warn(missing_docs)]

pub mod api;
pub mod client;
pub mod error;
pub mod retry;
pub mod slug;
pub mod types;

pub use api::ReleaseApi;
pub use client::GitHubClient;
pub use error::RemoteError;
pub use retry::{RetryPolicy, Sleeper, ThreadSleeper};
pub use slug::RepoSlug;
pub use types::{CommitSummary, PullRequestDetail, RateLimitStatus};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::api::ReleaseApi;
    pub use crate::client::GitHubClient;
    pub use crate::error::RemoteError;
    pub use crate::slug::RepoSlug;
    pub use crate::types::{CommitSummary, PullRequestDetail, RateLimitStatus};
}
