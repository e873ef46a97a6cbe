// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for leadtime-core

use leadtime_git::GitError;
use leadtime_github::RemoteError;
use thiserror::Error;

/// Errors that abort a release interval resolution
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Missing or malformed input
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A release reference could not be resolved locally
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// The interval start is not a proper ancestor of its end
    #[error("Release {from} is not an ancestor of {to}")]
    NotAncestor {
        /// Interval start
        from: String,
        /// Interval end
        to: String,
    },

    /// The two releases share no history
    #[error("Releases {from} and {to} have no common ancestor")]
    NoCommonAncestor {
        /// Interval start
        from: String,
        /// Interval end
        to: String,
    },

    /// A fatal remote failure (credentials, quota, interval endpoints)
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    /// The caller raised the cancel flag
    #[error("Resolution cancelled before completion")]
    Cancelled,
}

impl AnalysisError {
    /// Whether the failure came from the hosting service
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}
