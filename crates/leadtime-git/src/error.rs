// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for leadtime-git

use thiserror::Error;

/// Errors that can occur while reading the commit graph
#[derive(Debug, Error)]
pub enum GitError {
    /// Error from git2 library
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),

    /// Repository not found at the specified path
    #[error("Repository not found: {path}")]
    RepositoryNotFound {
        /// The path that was searched for a repository
        path: String,
    },

    /// Reference (tag, branch or SHA) that does not resolve to a commit
    #[error("Invalid commit reference: {reference}")]
    InvalidReference {
        /// The reference string that could not be resolved
        reference: String,
    },

    /// A commit SHA that is not present in the object store
    #[error("Commit not found: {sha}")]
    CommitNotFound {
        /// The missing commit SHA
        sha: String,
    },
}

impl GitError {
    /// Whether this error means the requested object simply does not exist
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::InvalidReference { .. } | Self::CommitNotFound { .. } => true,
            Self::Git2(e) => e.code() == git2::ErrorCode::NotFound,
            Self::RepositoryNotFound { .. } => false,
        }
    }
}
