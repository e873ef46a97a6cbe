// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Release analysis result

use chrono::{DateTime, Utc};
use leadtime_git::ReleaseTag;
use serde::Serialize;

use crate::pull_request::{PrSource, PullRequest};
use crate::stats::{Distribution, LeadTimeSummary};

/// An item left out of the analysis, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedItem {
    /// What was skipped, e.g. `commit 1a2b3c4` or `PR #7`
    pub item: String,
    /// Why
    pub reason: String,
}

/// Line change totals over all PRs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LineChanges {
    /// Lines added
    pub additions: u64,
    /// Lines deleted
    pub deletions: u64,
    /// Additions plus deletions
    pub total_changed: u64,
    /// Files changed
    pub changed_files: u64,
}

impl LineChanges {
    fn from_pull_requests(prs: &[PullRequest]) -> Self {
        let additions = prs.iter().map(|pr| pr.additions).sum();
        let deletions = prs.iter().map(|pr| pr.deletions).sum();
        Self {
            additions,
            deletions,
            total_changed: additions + deletions,
            changed_files: prs.iter().map(|pr| pr.changed_files).sum(),
        }
    }
}

/// One end of a release interval
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleasePoint {
    /// Tag or reference name
    pub tag: String,
    /// Commit SHA
    pub commit: String,
    /// Committer date of the commit
    pub date: DateTime<Utc>,
}

impl From<&ReleaseTag> for ReleasePoint {
    fn from(tag: &ReleaseTag) -> Self {
        Self {
            tag: tag.name.clone(),
            commit: tag.commit.sha.clone(),
            date: tag.date,
        }
    }
}

/// Pull requests shipped between two releases with lead-time statistics
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseAnalysis {
    release: ReleasePoint,
    previous: ReleasePoint,
    pull_requests: Vec<PullRequest>,
    lead_time: LeadTimeSummary,
    distribution: Distribution,
    line_changes: LineChanges,
    skipped: Vec<SkippedItem>,
    source: PrSource,
    depth_limited: bool,
}

impl ReleaseAnalysis {
    /// Stamp release dates, order by merge time and compute statistics
    #[must_use]
    pub fn new(
        release: &ReleaseTag,
        previous: &ReleaseTag,
        mut pull_requests: Vec<PullRequest>,
        skipped: Vec<SkippedItem>,
        source: PrSource,
        depth_limited: bool,
    ) -> Self {
        for pr in &mut pull_requests {
            pr.set_release_date(release.date);
        }
        // Unknown merge times sort last
        pull_requests.sort_by_key(|pr| (pr.merged_at.is_none(), pr.merged_at, pr.number));

        let samples: Vec<f64> = pull_requests.iter().map(PullRequest::lead_time_hours).collect();

        Self {
            release: release.into(),
            previous: previous.into(),
            lead_time: LeadTimeSummary::from_samples(&samples),
            distribution: Distribution::from_samples(&samples),
            line_changes: LineChanges::from_pull_requests(&pull_requests),
            pull_requests,
            skipped,
            source,
            depth_limited,
        }
    }

    /// The release analysed
    pub fn release(&self) -> &ReleasePoint {
        &self.release
    }

    /// The release before it
    pub fn previous(&self) -> &ReleasePoint {
        &self.previous
    }

    /// PRs ordered by merge time
    pub fn pull_requests(&self) -> &[PullRequest] {
        &self.pull_requests
    }

    /// Number of PRs
    pub fn pr_count(&self) -> usize {
        self.pull_requests.len()
    }

    /// Mean, median, p90, min and max lead time
    pub fn lead_time(&self) -> &LeadTimeSummary {
        &self.lead_time
    }

    /// Mean lead time in hours
    pub fn mean_lead_time(&self) -> f64 {
        self.lead_time.mean
    }

    /// Median lead time in hours
    pub fn median_lead_time(&self) -> f64 {
        self.lead_time.median
    }

    /// 90th percentile lead time in hours
    pub fn p90_lead_time(&self) -> f64 {
        self.lead_time.p90
    }

    /// Fast/medium/slow buckets
    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    /// Line change totals
    pub fn line_changes(&self) -> &LineChanges {
        &self.line_changes
    }

    /// Items left out, with reasons
    pub fn skipped(&self) -> &[SkippedItem] {
        &self.skipped
    }

    /// Number of items left out
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Whether PR data came from the hosting service or local history
    pub fn source(&self) -> PrSource {
        self.source
    }

    /// Whether the merge graph walk hit its depth bound
    ///
    /// When set, nested merges beyond the bound were not inspected and the PR
    /// list may be incomplete.
    pub fn depth_limited(&self) -> bool {
        self.depth_limited
    }
}
