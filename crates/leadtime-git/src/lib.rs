// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! leadtime-git: commit graph access for release lead-time analysis
//!
//! This library crate reads a local repository's object store to resolve
//! release tags, enumerate release ranges and walk merge history, and
//! recovers pull request numbers from commit messages.
//!
//! # Example
//!
//! ```no_run
//! use leadtime_git::{GitRepo, MergeGraphWalker, WalkOptions};
//!
//! let repo = GitRepo::open(".").expect("open repo");
//! let from = repo.resolve_tag("v1.0.0").expect("resolve from");
//! let to = repo.resolve_tag("v1.1.0").expect("resolve to");
//!
//! let walker = MergeGraphWalker::new(&repo, WalkOptions::default());
//! let outcome = walker.walk_release(&to.commit.sha, Some(&from.commit.sha))
//!     .expect("walk");
//!
//! for candidate in outcome.pr_candidates() {
//!     println!("#{} via {}", candidate.number, candidate.commit.short_sha());
//! }
//! ```

#![warn(missing_docs)]

pub mod classify;
pub mod commit;
pub mod error;
pub mod repo;
pub mod tags;
pub mod walker;

pub use classify::{PrReference, classify};
pub use commit::{CommitRef, ReleaseTag};
pub use error::GitError;
pub use repo::{CommitRange, GitRepo};
pub use walker::{
    CommitGraph, MergeGraphWalker, MissingCommit, PrCandidate, WalkOptions, WalkOutcome,
};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::classify::{PrReference, classify};
    pub use crate::commit::{CommitRef, ReleaseTag};
    pub use crate::error::GitError;
    pub use crate::repo::GitRepo;
    pub use crate::walker::{MergeGraphWalker, WalkOptions};
}
