// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Merge graph traversal
//!
//! Approximates "which pull requests landed in this release" from local
//! history alone. Starting at the release commit, merge commits are expanded
//! into their incoming branches (second and later parents) up to a depth
//! bound, while the mainline (first parent) is followed without spending
//! depth until the previous release is reached.
//!
//! The traversal is an explicit worklist of `(sha, remaining depth)` pairs. The
//! visited set is owned by the caller so several walks in one resolution share
//! it, and every commit is processed at most once even when merge paths
//! converge.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, warn};

use crate::classify::classify;
use crate::commit::CommitRef;
use crate::error::GitError;
use crate::repo::GitRepo;

/// Default bound on how many nested merges the walker descends into
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Read access to a commit DAG
pub trait CommitGraph {
    /// Look up a commit by full SHA
    ///
    /// # Errors
    ///
    /// Returns an error satisfying [`GitError::is_not_found`] when the commit
    /// does not exist.
    fn commit(&self, sha: &str) -> Result<CommitRef, GitError>;

    /// Whether `ancestor` is reachable from `descendant` (never reflexive)
    ///
    /// # Errors
    ///
    /// Returns `GitError` if either commit cannot be read.
    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool, GitError>;
}

impl CommitGraph for GitRepo {
    fn commit(&self, sha: &str) -> Result<CommitRef, GitError> {
        self.find_commit(sha)
    }

    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool, GitError> {
        GitRepo::is_ancestor(self, ancestor, descendant)
    }
}

/// Configuration for merge graph walks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOptions {
    /// How many merges deep incoming branches are followed
    pub max_depth: usize,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl WalkOptions {
    /// Set the depth bound
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Commits collected by a walk
#[derive(Debug, Clone, Default, Serialize)]
pub struct WalkOutcome {
    /// Candidate commits in visitation order
    pub commits: Vec<CommitRef>,
    /// A commit with unexplored parents sat at the depth bound
    pub depth_limited: bool,
    /// The walk ran into the boundary commit or its history
    pub boundary_reached: bool,
    /// Parents absent from the object store
    pub missing: Vec<MissingCommit>,
}

/// A commit the walk reached but the graph does not contain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingCommit {
    /// Commit SHA
    pub sha: String,
    /// Merge budget left when the walk reached it
    pub remaining: usize,
}

impl WalkOutcome {
    /// Fold another walk's results into this one
    pub fn absorb(&mut self, other: WalkOutcome) {
        self.commits.extend(other.commits);
        self.depth_limited |= other.depth_limited;
        self.boundary_reached |= other.boundary_reached;
        self.missing.extend(other.missing);
    }

    /// Distinct PR numbers referenced by the collected commits
    ///
    /// The first commit to mention a number owns it.
    #[must_use]
    pub fn pr_candidates(&self) -> Vec<PrCandidate> {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for commit in &self.commits {
            let reference = classify(&commit.message);
            for number in reference.numbers() {
                if seen.insert(number) {
                    candidates.push(PrCandidate {
                        number,
                        source_branch: reference.source_branch().map(str::to_string),
                        commit: commit.clone(),
                    });
                }
            }
        }

        candidates
    }
}

/// A PR number recovered from a commit message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrCandidate {
    /// Pull request number
    pub number: u64,
    /// Source branch, when the message names it
    pub source_branch: Option<String>,
    /// Commit whose message carried the reference
    pub commit: CommitRef,
}

/// Depth-bounded walker over a [`CommitGraph`]
pub struct MergeGraphWalker<'g, G: CommitGraph + ?Sized> {
    graph: &'g G,
    options: WalkOptions,
}

impl<'g, G: CommitGraph + ?Sized> MergeGraphWalker<'g, G> {
    /// Create a walker over `graph`
    pub fn new(graph: &'g G, options: WalkOptions) -> Self {
        Self { graph, options }
    }

    /// The options this walker was built with
    #[must_use]
    pub fn options(&self) -> WalkOptions {
        self.options
    }

    /// Walk from a release commit back to the previous release
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the start commit or an ancestry query fails.
    pub fn walk_release(
        &self,
        release: &str,
        boundary: Option<&str>,
    ) -> Result<WalkOutcome, GitError> {
        let mut visited = HashSet::new();
        self.walk(release, self.options.max_depth, boundary, &mut visited)
    }

    /// Walk from `start` with `depth` merges of budget
    ///
    /// Commits already in `visited` are skipped and every commit this walk
    /// touches is added to it. Parents missing from the graph are recorded in
    /// [`WalkOutcome::missing`] instead of failing the walk.
    ///
    /// # Errors
    ///
    /// Returns `GitError` for failures other than a missing commit.
    pub fn walk(
        &self,
        start: &str,
        depth: usize,
        boundary: Option<&str>,
        visited: &mut HashSet<String>,
    ) -> Result<WalkOutcome, GitError> {
        let mut outcome = WalkOutcome::default();
        let mut worklist: Vec<(String, usize)> = vec![(start.to_string(), depth)];
        // Best budget and parents of each commit this walk has recorded
        let mut expanded: HashMap<String, (usize, Vec<String>)> = HashMap::new();
        let mut truncated: HashSet<String> = HashSet::new();

        while let Some((sha, remaining)) = worklist.pop() {
            if boundary == Some(sha.as_str()) {
                outcome.boundary_reached = true;
                continue;
            }

            // A commit first reached through a side branch may come round
            // again via the mainline with more budget left.
            if let Some((best, parents)) = expanded.get_mut(&sha) {
                if *best >= remaining {
                    continue;
                }
                *best = remaining;
                truncated.remove(&sha);
                push_parents(&mut worklist, parents, remaining);
                continue;
            }
            if !visited.insert(sha.clone()) {
                continue;
            }

            let commit = match self.graph.commit(&sha) {
                Ok(commit) => commit,
                Err(e) if e.is_not_found() => {
                    warn!(sha = %sha, "Commit missing from local history, skipping");
                    outcome.missing.push(MissingCommit { sha, remaining });
                    continue;
                }
                Err(e) => return Err(e),
            };

            if let Some(boundary) = boundary
                && self.graph.is_ancestor(&sha, boundary)?
            {
                outcome.boundary_reached = true;
                continue;
            }

            if remaining == 0 {
                truncated.insert(sha.clone());
            } else {
                push_parents(&mut worklist, &commit.parents, remaining);
            }
            expanded.insert(sha, (remaining, commit.parents.clone()));
            outcome.commits.push(commit);
        }

        // Truncation only matters if it hid a commit nothing else reached
        outcome.depth_limited = truncated.iter().any(|sha| {
            expanded[sha]
                .1
                .iter()
                .any(|parent| boundary != Some(parent.as_str()) && !visited.contains(parent))
        });
        debug!(
            start = %start,
            depth,
            collected = outcome.commits.len(),
            depth_limited = outcome.depth_limited,
            boundary_reached = outcome.boundary_reached,
            "Merge graph walk complete"
        );

        Ok(outcome)
    }
}

/// Queue parents so incoming branches pop before the mainline
///
/// The first parent keeps the current budget; every other parent spends one
/// level of merge depth. Callers guarantee `remaining > 0`.
fn push_parents(worklist: &mut Vec<(String, usize)>, parents: &[String], remaining: usize) {
    if let Some((first, incoming)) = parents.split_first() {
        worklist.push((first.clone(), remaining));
        for parent in incoming.iter().rev() {
            worklist.push((parent.clone(), remaining - 1));
        }
    }
}
