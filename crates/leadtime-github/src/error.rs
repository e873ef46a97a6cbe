// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for leadtime-github

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors returned by the remote hosting service
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Network failure, timeout or 5xx response
    #[error("Transient failure calling {endpoint}: {message}")]
    Transient {
        /// API path that failed
        endpoint: String,
        /// Underlying failure description
        message: String,
    },

    /// The API quota is exhausted
    #[error("GitHub API rate limit exceeded{}", reset_hint(.reset_at))]
    RateLimited {
        /// When the quota resets, if the service said so
        reset_at: Option<DateTime<Utc>>,
    },

    /// The credential was rejected
    #[error("GitHub authentication failed (HTTP {status}): check the access token")]
    AuthFailure {
        /// HTTP status returned
        status: u16,
    },

    /// A single requested item does not exist
    #[error("Not found: {resource}")]
    NotFound {
        /// Description of the missing item
        resource: String,
    },

    /// Any other unexpected HTTP status
    #[error("Unexpected HTTP {status} from {endpoint}: {message}")]
    Http {
        /// HTTP status returned
        status: u16,
        /// API path that failed
        endpoint: String,
        /// Response body or reason
        message: String,
    },

    /// The response body did not match the expected shape
    #[error("Invalid response from {endpoint}: {source}")]
    Decode {
        /// API path whose body failed to decode
        endpoint: String,
        /// JSON error
        #[source]
        source: serde_json::Error,
    },

    /// The repository URL or slug could not be parsed
    #[error("Invalid repository: {0}")]
    InvalidRepository(String),
}

fn reset_hint(reset_at: &Option<DateTime<Utc>>) -> String {
    reset_at
        .map(|at| format!(" (resets at {})", at.to_rfc3339()))
        .unwrap_or_default()
}

impl RemoteError {
    /// Whether retrying the same request may succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. } | Self::RateLimited { .. })
    }

    /// Whether the whole resolution must stop
    ///
    /// Bad credentials cannot be fixed by retrying, and an exhausted quota
    /// makes every further call fail.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::AuthFailure { .. } | Self::RateLimited { .. } | Self::InvalidRepository(_)
        )
    }

    /// Whether this is a definitive "item does not exist" answer
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
