// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Release interval resolution
//!
//! Turns a pair of release references into the set of pull requests that
//! shipped between them. With a [`ReleaseApi`] the hosting service is the
//! source of truth for every PR; without one the merge graph walker recovers
//! PR numbers from local commit messages.
//!
//! All mutable state of one resolution (visited commits, accepted PR numbers,
//! skipped items) lives in a [`ResolutionContext`] that is threaded through
//! every step and dropped when the resolution returns.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use leadtime_git::{
    CommitRef, GitRepo, MergeGraphWalker, MissingCommit, ReleaseTag, WalkOptions, classify,
};
use leadtime_github::types::DEFAULT_LOW_WATER_MARK;
use leadtime_github::{CommitSummary, PullRequestDetail, ReleaseApi, RemoteError};
use tracing::{debug, info, warn};

use crate::analysis::{ReleaseAnalysis, SkippedItem};
use crate::error::AnalysisError;
use crate::pull_request::{PrSource, PullRequest};

/// Shared cancellation signal
///
/// Clones observe the same flag. Once raised, no further remote request is
/// started and the resolution fails with [`AnalysisError::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// A flag that is not raised
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether the flag has been raised
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Resolution settings
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Merge graph walk bounds
    pub walk: WalkOptions,
    /// Warn when fewer remote requests than this remain
    pub low_water_mark: u64,
    /// Compare remote tag targets with local ones and warn on mismatch
    pub verify_remote_tags: bool,
    /// Cancellation signal
    pub cancel: CancelFlag,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            walk: WalkOptions::default(),
            low_water_mark: DEFAULT_LOW_WATER_MARK,
            verify_remote_tags: true,
            cancel: CancelFlag::default(),
        }
    }
}

impl ResolveOptions {
    /// Override the walk bounds
    #[must_use]
    pub fn with_walk(mut self, walk: WalkOptions) -> Self {
        self.walk = walk;
        self
    }

    /// Use `cancel` as the cancellation signal
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Mutable state of one resolution
#[derive(Debug)]
pub struct ResolutionContext {
    visited: HashSet<String>,
    accepted: HashSet<u64>,
    pull_requests: Vec<PullRequest>,
    skipped: Vec<SkippedItem>,
    depth_limited: bool,
    cancel: CancelFlag,
}

impl ResolutionContext {
    /// Fresh context observing `cancel`
    #[must_use]
    pub fn new(cancel: CancelFlag) -> Self {
        Self {
            visited: HashSet::new(),
            accepted: HashSet::new(),
            pull_requests: Vec::new(),
            skipped: Vec::new(),
            depth_limited: false,
            cancel,
        }
    }

    /// Fail if cancellation was requested
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Cancelled`] once the flag is raised.
    pub fn check_cancelled(&self) -> Result<(), AnalysisError> {
        if self.cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }
        Ok(())
    }

    /// Mark a commit as seen; `false` if it already was
    pub fn visit(&mut self, sha: &str) -> bool {
        self.visited.insert(sha.to_string())
    }

    /// Whether a PR number has been accepted
    #[must_use]
    pub fn is_accepted(&self, number: u64) -> bool {
        self.accepted.contains(&number)
    }

    /// Accept a PR unless its number is already taken; first seen wins
    pub fn accept(&mut self, pr: PullRequest) -> bool {
        if !self.accepted.insert(pr.number) {
            debug!(number = pr.number, "PR already accepted, ignoring duplicate");
            return false;
        }
        debug!(number = pr.number, title = %pr.title, "Accepted PR");
        self.pull_requests.push(pr);
        true
    }

    /// Record an item left out of the analysis
    pub fn skip(&mut self, item: impl Into<String>, reason: impl Into<String>) {
        let skipped = SkippedItem {
            item: item.into(),
            reason: reason.into(),
        };
        warn!(item = %skipped.item, reason = %skipped.reason, "Skipping");
        self.skipped.push(skipped);
    }

    /// PRs accepted so far
    #[must_use]
    pub fn pull_requests(&self) -> &[PullRequest] {
        &self.pull_requests
    }

    /// Items skipped so far
    #[must_use]
    pub fn skipped(&self) -> &[SkippedItem] {
        &self.skipped
    }

    fn into_analysis(
        self,
        release: &ReleaseTag,
        previous: &ReleaseTag,
        source: PrSource,
    ) -> ReleaseAnalysis {
        ReleaseAnalysis::new(
            release,
            previous,
            self.pull_requests,
            self.skipped,
            source,
            self.depth_limited,
        )
    }
}

fn short(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}

/// A commit whose PRs are looked up remotely
#[derive(Debug, Clone)]
struct Candidate {
    sha: String,
    message: String,
}

impl Candidate {
    fn label(&self) -> String {
        format!("commit {}", short(&self.sha))
    }
}

impl From<CommitSummary> for Candidate {
    fn from(commit: CommitSummary) -> Self {
        Self {
            sha: commit.sha,
            message: commit.message,
        }
    }
}

impl From<CommitRef> for Candidate {
    fn from(commit: CommitRef) -> Self {
        Self {
            sha: commit.sha,
            message: commit.message,
        }
    }
}

/// Resolve the pull requests shipped between `from` and `to`
///
/// `from` and `to` are tags (or any reference) in `repo`. With `api` the
/// hosting service supplies PR data; otherwise commit messages are used.
///
/// # Errors
///
/// Fails on empty references, unresolvable references, an interval whose
/// start is not an ancestor of its end, fatal remote failures (credentials,
/// exhausted quota, unknown interval endpoints) and cancellation. Failures of
/// individual commits or PRs are recorded in [`ReleaseAnalysis::skipped`].
pub fn analyze_interval(
    repo: &GitRepo,
    from: &str,
    to: &str,
    api: Option<&dyn ReleaseApi>,
    options: &ResolveOptions,
) -> Result<ReleaseAnalysis, AnalysisError> {
    let (from, to) = (from.trim(), to.trim());
    if from.is_empty() || to.is_empty() {
        return Err(AnalysisError::Configuration(
            "both release references must be non-empty".to_string(),
        ));
    }

    let previous = repo.resolve_tag(from)?;
    let release = repo.resolve_tag(to)?;
    validate_interval(repo, &previous, &release, api.is_some())?;

    let mode = if api.is_some() { "remote" } else { "local" };
    info!(from = %previous.name, to = %release.name, mode, "Resolving release interval");

    let mut ctx = ResolutionContext::new(options.cancel.clone());
    ctx.check_cancelled()?;

    let source = match api {
        Some(api) => {
            resolve_remote(repo, api, &previous, &release, options, &mut ctx)?;
            PrSource::Remote
        }
        None => {
            resolve_local(repo, &previous, &release, options, &mut ctx)?;
            PrSource::Local
        }
    };

    let analysis = ctx.into_analysis(&release, &previous, source);
    info!(
        prs = analysis.pr_count(),
        skipped = analysis.skipped_count(),
        mean_hours = analysis.mean_lead_time(),
        "Release interval resolved"
    );
    Ok(analysis)
}

fn validate_interval(
    repo: &GitRepo,
    previous: &ReleaseTag,
    release: &ReleaseTag,
    remote: bool,
) -> Result<(), AnalysisError> {
    let not_ancestor = || AnalysisError::NotAncestor {
        from: previous.name.clone(),
        to: release.name.clone(),
    };

    if previous.commit.sha == release.commit.sha {
        return Err(not_ancestor());
    }

    if repo
        .merge_base(&previous.commit.sha, &release.commit.sha)?
        .is_none()
    {
        if remote {
            warn!(
                from = %previous.name,
                to = %release.name,
                "Releases share no local history, relying on the remote comparison"
            );
            return Ok(());
        }
        return Err(AnalysisError::NoCommonAncestor {
            from: previous.name.clone(),
            to: release.name.clone(),
        });
    }

    if !repo.is_ancestor(&previous.commit.sha, &release.commit.sha)? {
        return Err(not_ancestor());
    }
    Ok(())
}

fn resolve_local(
    repo: &GitRepo,
    previous: &ReleaseTag,
    release: &ReleaseTag,
    options: &ResolveOptions,
    ctx: &mut ResolutionContext,
) -> Result<(), AnalysisError> {
    let walker = MergeGraphWalker::new(repo, options.walk);
    let outcome = walker.walk(
        &release.commit.sha,
        options.walk.max_depth,
        Some(&previous.commit.sha),
        &mut ctx.visited,
    )?;

    ctx.depth_limited |= outcome.depth_limited;
    if outcome.depth_limited {
        warn!(
            max_depth = options.walk.max_depth,
            "Merge graph walk hit its depth bound, results are approximate"
        );
    }
    for missing in &outcome.missing {
        ctx.skip(format!("commit {}", missing.sha), "missing from local history");
    }
    for candidate in outcome.pr_candidates() {
        ctx.accept(PullRequest::from_candidate(&candidate));
    }

    Ok(())
}

fn resolve_remote(
    repo: &GitRepo,
    api: &dyn ReleaseApi,
    previous: &ReleaseTag,
    release: &ReleaseTag,
    options: &ResolveOptions,
    ctx: &mut ResolutionContext,
) -> Result<(), AnalysisError> {
    check_quota(api, options.low_water_mark)?;

    if options.verify_remote_tags {
        for tag in [previous, release] {
            ctx.check_cancelled()?;
            verify_remote_tag(api, tag)?;
        }
    }

    ctx.check_cancelled()?;
    let compared = api.compare_refs(&previous.name, &release.name)?;
    info!(
        commits = compared.len(),
        "Remote comparison of {}...{}", previous.name, release.name
    );

    let merge_parents: Vec<String> = compared
        .iter()
        .filter(|c| c.is_merge())
        .flat_map(|c| c.parents.iter().skip(1).cloned())
        .collect();

    let mut candidates: Vec<Candidate> = Vec::new();
    for commit in compared {
        if ctx.visit(&commit.sha) {
            candidates.push(commit.into());
        }
    }

    candidates.extend(walk_merge_parents(
        repo,
        api,
        &merge_parents,
        &previous.commit.sha,
        options.walk,
        ctx,
    )?);

    for candidate in &candidates {
        lookup_candidate(api, candidate, ctx)?;
    }

    Ok(())
}

fn check_quota(api: &dyn ReleaseApi, low_water_mark: u64) -> Result<(), AnalysisError> {
    match api.check_rate_limit() {
        Ok(quota) if quota.blocks_at(Utc::now()) => Err(RemoteError::RateLimited {
            reset_at: Some(quota.reset_at),
        }
        .into()),
        Ok(quota) => {
            if quota.is_low(low_water_mark) {
                warn!(
                    remaining = quota.remaining,
                    reset_at = %quota.reset_at.to_rfc3339(),
                    "GitHub API quota is low"
                );
            }
            Ok(())
        }
        Err(e) if e.is_fatal() => Err(e.into()),
        Err(e) => {
            warn!(error = %e, "Could not read GitHub API quota, continuing");
            Ok(())
        }
    }
}

fn verify_remote_tag(api: &dyn ReleaseApi, tag: &ReleaseTag) -> Result<(), AnalysisError> {
    match api.resolve_tag(&tag.name) {
        Ok(sha) if sha != tag.commit.sha => {
            warn!(
                tag = %tag.name,
                local = %tag.commit.short_sha(),
                remote = %short(&sha),
                "Tag points at different commits locally and remotely"
            );
            Ok(())
        }
        Ok(_) => Ok(()),
        Err(e) if e.is_fatal() => Err(e.into()),
        Err(e) => {
            debug!(tag = %tag.name, error = %e, "Remote tag lookup failed");
            Ok(())
        }
    }
}

/// Walk incoming branches of compared merges through local history
///
/// Catches commits the remote comparison omitted. Commits the local clone
/// lacks are fetched from the hosting service and their parents walked in
/// turn, so a branch that only exists remotely is followed under the same
/// depth budget.
fn walk_merge_parents(
    repo: &GitRepo,
    api: &dyn ReleaseApi,
    parents: &[String],
    boundary: &str,
    walk: WalkOptions,
    ctx: &mut ResolutionContext,
) -> Result<Vec<Candidate>, AnalysisError> {
    let mut found = Vec::new();
    if parents.is_empty() {
        return Ok(found);
    }
    if walk.max_depth == 0 {
        ctx.depth_limited = true;
        return Ok(found);
    }

    let walker = MergeGraphWalker::new(repo, walk);
    let mut local: Vec<(String, usize)> = parents
        .iter()
        .rev()
        .map(|parent| (parent.clone(), walk.max_depth - 1))
        .collect();
    let mut remote: Vec<MissingCommit> = Vec::new();

    loop {
        while let Some((sha, budget)) = local.pop() {
            let outcome = walker.walk(&sha, budget, Some(boundary), &mut ctx.visited)?;
            ctx.depth_limited |= outcome.depth_limited;
            found.extend(outcome.commits.into_iter().map(Candidate::from));
            remote.extend(outcome.missing);
        }

        let Some(missing) = remote.pop() else {
            break;
        };
        ctx.check_cancelled()?;
        let commit = match api.get_commit(&missing.sha) {
            Ok(commit) => commit,
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                ctx.skip(format!("commit {}", missing.sha), e.to_string());
                continue;
            }
        };

        if missing.remaining == 0 {
            ctx.depth_limited |= commit
                .parents
                .iter()
                .any(|parent| parent != boundary && !ctx.visited.contains(parent));
        } else if let Some((first, incoming)) = commit.parents.split_first() {
            local.push((first.clone(), missing.remaining));
            for parent in incoming.iter().rev() {
                local.push((parent.clone(), missing.remaining - 1));
            }
        }
        found.push(commit.into());
    }

    if !found.is_empty() {
        debug!(
            commits = found.len(),
            "Local merge walk found commits outside the remote comparison"
        );
    }
    Ok(found)
}

fn lookup_candidate(
    api: &dyn ReleaseApi,
    candidate: &Candidate,
    ctx: &mut ResolutionContext,
) -> Result<(), AnalysisError> {
    ctx.check_cancelled()?;

    let prs = match api.get_pull_requests_for_commit(&candidate.sha) {
        Ok(prs) => prs,
        Err(e) if e.is_fatal() => return Err(e.into()),
        Err(e) => {
            ctx.skip(candidate.label(), e.to_string());
            return Ok(());
        }
    };

    if prs.is_empty() {
        return lookup_by_message(api, candidate, ctx);
    }

    for pr in prs {
        consider(api, pr, ctx)?;
    }
    Ok(())
}

/// Fall back to PR numbers written in the commit message
fn lookup_by_message(
    api: &dyn ReleaseApi,
    candidate: &Candidate,
    ctx: &mut ResolutionContext,
) -> Result<(), AnalysisError> {
    for number in classify(&candidate.message).numbers() {
        if ctx.is_accepted(number) {
            continue;
        }
        ctx.check_cancelled()?;
        match api.get_pull_request(number) {
            Ok(pr) => consider(api, pr, ctx)?,
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => ctx.skip(format!("PR #{number}"), e.to_string()),
        }
    }
    Ok(())
}

/// Accept a merged PR, fetching line counts when the listing lacked them
fn consider(
    api: &dyn ReleaseApi,
    pr: PullRequestDetail,
    ctx: &mut ResolutionContext,
) -> Result<(), AnalysisError> {
    if !pr.is_merged() {
        debug!(number = pr.number, state = %pr.state, "PR not merged, ignoring");
        return Ok(());
    }
    if ctx.is_accepted(pr.number) {
        return Ok(());
    }

    let pr = if pr.has_line_counts() {
        pr
    } else {
        ctx.check_cancelled()?;
        match api.get_pull_request(pr.number) {
            Ok(full) => full,
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                warn!(number = pr.number, error = %e, "Could not fetch PR details, line counts unknown");
                pr
            }
        }
    };

    ctx.accept(PullRequest::from_remote(pr));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_cancel_flag_is_shared() {
        let flag = CancelFlag::new();
        let clone = flag.clone();
        assert!(!flag.is_cancelled());
        clone.cancel();
        assert!(flag.is_cancelled());
    }

    #[test]
    fn test_context_first_seen_wins() {
        let mut ctx = ResolutionContext::new(CancelFlag::new());
        let mut first = PullRequest::from_remote(detail(42, "First"));
        first.additions = 1;
        let second = PullRequest::from_remote(detail(42, "Second"));

        assert!(ctx.accept(first));
        assert!(!ctx.accept(second));
        assert_eq!(ctx.pull_requests().len(), 1);
        assert_eq!(ctx.pull_requests()[0].title, "First");
        assert!(ctx.is_accepted(42));
    }

    #[test]
    fn test_context_visit_and_skip() {
        let mut ctx = ResolutionContext::new(CancelFlag::new());
        assert!(ctx.visit("abc"));
        assert!(!ctx.visit("abc"));

        ctx.skip("PR #7", "Not found");
        assert_eq!(
            ctx.skipped(),
            &[SkippedItem {
                item: "PR #7".into(),
                reason: "Not found".into()
            }]
        );
    }

    #[test]
    fn test_context_cancellation() {
        let cancel = CancelFlag::new();
        let ctx = ResolutionContext::new(cancel.clone());
        assert!(ctx.check_cancelled().is_ok());
        cancel.cancel();
        assert!(matches!(ctx.check_cancelled(), Err(AnalysisError::Cancelled)));
    }

    #[test]
    fn test_candidate_label() {
        let candidate = Candidate {
            sha: "0123456789abcdef".into(),
            message: String::new(),
        };
        assert_eq!(candidate.label(), "commit 0123456");
    }

    fn detail(number: u64, title: &str) -> PullRequestDetail {
        PullRequestDetail {
            number,
            title: title.into(),
            body: None,
            user: None,
            state: "closed".into(),
            merged: Some(true),
            created_at: None,
            merged_at: None,
            base: None,
            head: None,
            merge_commit_sha: None,
            additions: Some(0),
            deletions: Some(0),
            changed_files: Some(0),
        }
    }
}
