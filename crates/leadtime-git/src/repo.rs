// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Commit graph access
//!
//! This module wraps a local repository's object store using the `git2`
//! crate: resolving release tags to commits, ancestry queries and
//! enumerating the commits of a release range.

use crate::commit::{CommitRef, ReleaseTag};
use crate::error::GitError;
use crate::tags;
use chrono::{DateTime, TimeZone, Utc};
use git2::{ErrorCode, ObjectType, Oid, Repository, Revwalk, Sort};
use std::path::Path;
use tracing::debug;

/// A git repository wrapper for release analysis
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Open a git repository at the given path
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepositoryNotFound` if the path is not a git repository.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let path = path.as_ref();
        let repo = Repository::open(path).map_err(|_| GitError::RepositoryNotFound {
            path: path.display().to_string(),
        })?;
        Ok(Self { repo })
    }

    /// Discover and open a git repository containing the given path
    ///
    /// This walks up the directory tree to find a `.git` directory.
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepositoryNotFound` if no repository is found.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let path = path.as_ref();
        let repo = Repository::discover(path).map_err(|_| GitError::RepositoryNotFound {
            path: path.display().to_string(),
        })?;
        Ok(Self { repo })
    }

    /// Get the repository path
    #[must_use]
    pub fn path(&self) -> &Path {
        self.repo.path()
    }

    /// Resolve a tag, branch, full ref name or SHA to the commit it marks
    ///
    /// Annotated tags are peeled through however many tag objects they chain.
    ///
    /// # Errors
    ///
    /// Returns `GitError::InvalidReference` if the reference cannot be resolved
    /// to a commit.
    pub fn resolve_ref(&self, reference: &str) -> Result<CommitRef, GitError> {
        let (commit, _) = self.peel(reference)?;
        Ok(commit)
    }

    /// Resolve a release tag to its commit and release date
    ///
    /// # Errors
    ///
    /// Returns `GitError::InvalidReference` if the tag cannot be resolved.
    pub fn resolve_tag(&self, name: &str) -> Result<ReleaseTag, GitError> {
        let (commit, annotated) = self.peel(name)?;
        debug!(tag = %name, sha = %commit.sha, annotated, "Resolved release tag");
        Ok(ReleaseTag::new(name, commit, annotated))
    }

    fn peel(&self, reference: &str) -> Result<(CommitRef, bool), GitError> {
        let invalid = || GitError::InvalidReference {
            reference: reference.to_string(),
        };

        let obj = self
            .repo
            .revparse_single(reference)
            .or_else(|_| self.repo.revparse_single(&format!("refs/tags/{reference}")))
            .map_err(|_| invalid())?;

        let annotated = obj.kind() == Some(ObjectType::Tag);
        let git_commit = obj.peel_to_commit().map_err(|_| invalid())?;
        Ok((to_commit_ref(&git_commit), annotated))
    }

    /// Look up a single commit by full SHA
    ///
    /// # Errors
    ///
    /// Returns `GitError::CommitNotFound` if the commit is not in the object store.
    pub fn find_commit(&self, sha: &str) -> Result<CommitRef, GitError> {
        let not_found = || GitError::CommitNotFound {
            sha: sha.to_string(),
        };
        let oid = Oid::from_str(sha).map_err(|_| not_found())?;
        let git_commit = self.repo.find_commit(oid).map_err(|e| {
            if e.code() == ErrorCode::NotFound {
                not_found()
            } else {
                GitError::Git2(e)
            }
        })?;
        Ok(to_commit_ref(&git_commit))
    }

    /// Most recent common ancestor of two commits
    ///
    /// Returns `Ok(None)` when the histories share no commit.
    ///
    /// # Errors
    ///
    /// Returns `GitError` if either SHA is not a commit or the query fails.
    pub fn merge_base(&self, a: &str, b: &str) -> Result<Option<CommitRef>, GitError> {
        let a_oid = self.oid(a)?;
        let b_oid = self.oid(b)?;
        match self.repo.merge_base(a_oid, b_oid) {
            Ok(oid) => Ok(Some(self.find_commit(&oid.to_string())?)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::Git2(e)),
        }
    }

    /// Whether `ancestor` is reachable from `descendant`
    ///
    /// A commit is not its own ancestor.
    ///
    /// # Errors
    ///
    /// Returns `GitError` if either SHA is not a commit.
    pub fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool, GitError> {
        let ancestor = self.oid(ancestor)?;
        let descendant = self.oid(descendant)?;
        Ok(self.repo.graph_descendant_of(descendant, ancestor)?)
    }

    /// Commits reachable from `to` but not from `from`
    ///
    /// The sequence is lazy, newest first in topological order, and follows
    /// only first parents on the `to` side so side-branch history owned by an
    /// earlier release is never visited twice.
    ///
    /// # Errors
    ///
    /// Returns `GitError` if either endpoint does not resolve.
    pub fn commits_in_range(&self, from: &str, to: &str) -> Result<CommitRange<'_>, GitError> {
        let from_oid = self.resolve_oid(from)?;
        let to_oid = self.resolve_oid(to)?;

        let mut walk = self.repo.revwalk()?;
        walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        walk.simplify_first_parent()?;
        walk.push(to_oid)?;
        walk.hide(from_oid)?;

        Ok(CommitRange {
            repo: &self.repo,
            walk,
        })
    }

    /// Names of all tags in the repository
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the tag list cannot be read.
    pub fn tag_names(&self) -> Result<Vec<String>, GitError> {
        let names = self.repo.tag_names(None)?;
        Ok(names.iter().flatten().map(str::to_string).collect())
    }

    /// Find the release tag published immediately before `tag`
    ///
    /// Only `vMAJOR.MINOR.PATCH` style tags sharing the major version of `tag`
    /// are considered.
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the tag list cannot be read.
    pub fn previous_release_tag(&self, tag: &str) -> Result<Option<String>, GitError> {
        let names = self.tag_names()?;
        let previous = tags::previous_release(&names, tag);
        debug!(tag = %tag, previous = ?previous, candidates = names.len(), "Located previous release");
        Ok(previous)
    }

    /// URL of a configured remote, if any
    #[must_use]
    pub fn remote_url(&self, name: &str) -> Option<String> {
        self.repo
            .find_remote(name)
            .ok()
            .and_then(|remote| remote.url().map(str::to_string))
    }

    fn oid(&self, sha: &str) -> Result<Oid, GitError> {
        Oid::from_str(sha).map_err(|_| GitError::CommitNotFound {
            sha: sha.to_string(),
        })
    }

    fn resolve_oid(&self, reference: &str) -> Result<Oid, GitError> {
        match Oid::from_str(reference) {
            Ok(oid) if reference.len() == 40 => Ok(oid),
            _ => {
                let commit = self.resolve_ref(reference)?;
                self.oid(&commit.sha)
            }
        }
    }
}

/// Lazy sequence of commits produced by [`GitRepo::commits_in_range`]
pub struct CommitRange<'repo> {
    repo: &'repo Repository,
    walk: Revwalk<'repo>,
}

impl Iterator for CommitRange<'_> {
    type Item = Result<CommitRef, GitError>;

    fn next(&mut self) -> Option<Self::Item> {
        let oid = match self.walk.next()? {
            Ok(oid) => oid,
            Err(e) => return Some(Err(GitError::Git2(e))),
        };
        Some(
            self.repo
                .find_commit(oid)
                .map(|c| to_commit_ref(&c))
                .map_err(GitError::Git2),
        )
    }
}

/// Extract commit metadata from a git2 commit
fn to_commit_ref(git_commit: &git2::Commit<'_>) -> CommitRef {
    let author = git_commit.author();
    let committer = git_commit.committer();

    CommitRef {
        sha: git_commit.id().to_string(),
        parents: git_commit.parent_ids().map(|id| id.to_string()).collect(),
        author: author.name().unwrap_or("Unknown").to_string(),
        author_email: author.email().unwrap_or("").to_string(),
        authored_at: to_utc(author.when()),
        committed_at: to_utc(committer.when()),
        message: git_commit.message().unwrap_or("").to_string(),
    }
}

fn to_utc(time: git2::Time) -> DateTime<Utc> {
    Utc.timestamp_opt(time.seconds(), 0)
        .single()
        .unwrap_or_else(Utc::now)
}
