// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Bounded retry with exponential backoff
//!
//! A request moves through a small state machine:
//!
//! ```text
//! Attempt(n) --ok--------------------------> Success
//! Attempt(n) --retryable, n < max----------> Backoff(n) --sleep--> Attempt(n + 1)
//! Attempt(n) --not retryable or n == max---> Fail
//! ```

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::RemoteError;

/// Default number of retries after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay before the first retry
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);

/// Suspends the current thread between attempts
///
/// Tests substitute an implementation that records delays instead of
/// sleeping.
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`
    fn sleep(&self, duration: Duration);
}

/// Sleeper backed by [`std::thread::sleep`]
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Retry policy for remote calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry; each further retry doubles it
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: DEFAULT_INITIAL_DELAY,
        }
    }
}

enum RetryState {
    Attempt { retry: u32 },
    Backoff { retry: u32, error: RemoteError },
}

impl RetryPolicy {
    /// Policy that never retries
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::ZERO,
        }
    }

    /// Delay before retry number `retry` (zero-based)
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.initial_delay.saturating_mul(factor)
    }

    /// All delays the policy may wait, in order
    #[must_use]
    pub fn delays(&self) -> Vec<Duration> {
        (0..self.max_retries).map(|r| self.delay_for(r)).collect()
    }

    /// Run `op` until it succeeds, fails permanently, or retries run out
    ///
    /// Only [`RemoteError::is_retryable`] errors are retried. The last error
    /// is returned once the budget is spent.
    pub fn run<T, F>(&self, sleeper: &dyn Sleeper, label: &str, mut op: F) -> Result<T, RemoteError>
    where
        F: FnMut() -> Result<T, RemoteError>,
    {
        let mut state = RetryState::Attempt { retry: 0 };

        loop {
            state = match state {
                RetryState::Attempt { retry } => match op() {
                    Ok(value) => {
                        if retry > 0 {
                            debug!("{} succeeded after {} retries", label, retry);
                        }
                        return Ok(value);
                    }
                    Err(error) if error.is_retryable() && retry < self.max_retries => {
                        RetryState::Backoff { retry, error }
                    }
                    Err(error) => {
                        if error.is_retryable() {
                            warn!("{} failed after {} retries: {}", label, retry, error);
                        }
                        return Err(error);
                    }
                },
                RetryState::Backoff { retry, error } => {
                    let delay = self.delay_for(retry);
                    warn!(
                        "{} failed ({}), retrying in {:?} ({}/{})",
                        label,
                        error,
                        delay,
                        retry + 1,
                        self.max_retries
                    );
                    sleeper.sleep(delay);
                    RetryState::Attempt { retry: retry + 1 }
                }
            };
        }
    }
}
