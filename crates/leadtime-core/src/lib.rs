// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! leadtime-core: release interval resolution and lead-time statistics
//!
//! This library crate combines local commit graph access (`leadtime-git`) and
//! the GitHub client (`leadtime-github`) to determine which pull requests a
//! release delivered and how long each waited between merge and release.
//!
//! # Example
//!
//! ```no_run
//! use leadtime_core::{ResolveOptions, analyze_interval};
//! use leadtime_git::GitRepo;
//!
//! let repo = GitRepo::discover(".").expect("open repo");
//! let analysis = analyze_interval(&repo, "v1.0.0", "v1.1.0", None, &ResolveOptions::default())
//!     .expect("analysis");
//!
//! println!(
//!     "{} PRs, median lead time {:.1}h",
//!     analysis.pr_count(),
//!     analysis.median_lead_time()
//! );
//! ```

#![warn(missing_docs)]

pub mod analysis;
pub mod error;
pub mod pull_request;
pub mod resolver;
pub mod stats;

pub use analysis::{LineChanges, ReleaseAnalysis, ReleasePoint, SkippedItem};
pub use error::AnalysisError;
pub use pull_request::{PrSource, PullRequest};
pub use resolver::{CancelFlag, ResolutionContext, ResolveOptions, analyze_interval};
pub use stats::{Bucket, BucketShare, Distribution, LeadTimeSummary};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::analysis::ReleaseAnalysis;
    pub use crate::error::AnalysisError;
    pub use crate::pull_request::{PrSource, PullRequest};
    pub use crate::resolver::{CancelFlag, ResolveOptions, analyze_interval};
}
