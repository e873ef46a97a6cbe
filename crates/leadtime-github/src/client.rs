// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Blocking GitHub REST client
//!
//! All requests are plain `GET`s with JSON bodies. Each goes through the
//! client's [`RetryPolicy`]; the last seen rate-limit headers are kept so a
//! known-exhausted quota fails fast instead of burning retries.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::api::ReleaseApi;
use crate::error::RemoteError;
use crate::retry::{RetryPolicy, Sleeper, ThreadSleeper};
use crate::slug::RepoSlug;
use crate::types::{
    CommitPayload, CommitSummary, CompareResponse, GitRefPayload, PullRequestDetail,
    RateLimitResponse, RateLimitStatus,
};

/// Commits requested per compare page (GitHub maximum)
pub const COMPARE_PAGE_SIZE: usize = 100;

/// Upper bound on compare pages fetched for one range
pub const MAX_COMPARE_PAGES: usize = 100;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("leadtime/", env!("CARGO_PKG_VERSION"));

/// Nested annotated tags are peeled at most this many times
const MAX_TAG_PEEL: usize = 8;

/// GitHub REST client for a single repository
pub struct GitHubClient {
    api_base: String,
    slug: RepoSlug,
    token: Option<String>,
    agent: ureq::Agent,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    quota: Mutex<Option<RateLimitStatus>>,
}

fn make_agent(timeout: Duration) -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false)
        .timeout_global(Some(timeout))
        .build()
        .new_agent()
}

impl GitHubClient {
    /// Create a client for `slug`, authenticating with `token` when given
    pub fn new(slug: RepoSlug, token: Option<String>) -> Self {
        Self {
            api_base: slug.api_base(),
            slug,
            token: token.filter(|t| !t.trim().is_empty()),
            agent: make_agent(DEFAULT_TIMEOUT),
            retry: RetryPolicy::default(),
            sleeper: Arc::new(ThreadSleeper),
            quota: Mutex::new(None),
        }
    }

    /// Override the API root (enterprise proxies, tests)
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the retry policy
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Override how the client waits between retries
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Override the per-request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = make_agent(timeout);
        self
    }

    /// Repository this client talks to
    pub fn slug(&self) -> &RepoSlug {
        &self.slug
    }

    /// API root in use
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Whether requests carry a token
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Last quota reported by the service, if any
    pub fn last_known_quota(&self) -> Option<RateLimitStatus> {
        self.quota.lock().ok().and_then(|guard| *guard)
    }

    fn repo_path(&self, rest: &str) -> String {
        format!("/repos/{}/{}/{}", self.slug.owner, self.slug.name, rest)
    }

    fn ensure_quota(&self) -> Result<(), RemoteError> {
        if let Some(quota) = self.last_known_quota()
            && quota.blocks_at(Utc::now())
        {
            return Err(RemoteError::RateLimited {
                reset_at: Some(quota.reset_at),
            });
        }
        Ok(())
    }

    fn record_quota(&self, headers: &QuotaHeaders) {
        let (Some(remaining), Some(reset_at)) = (headers.remaining, headers.reset_at) else {
            return;
        };
        if let Ok(mut guard) = self.quota.lock() {
            *guard = Some(RateLimitStatus {
                limit: headers.limit,
                remaining,
                reset_at,
            });
        }
    }

    fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, RemoteError> {
        self.ensure_quota()?;
        self.fetch_json(endpoint)
    }

    fn fetch_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, RemoteError> {
        let label = format!("GET {endpoint}");
        let body = self
            .retry
            .run(self.sleeper.as_ref(), &label, || self.get_once(endpoint))?;

        serde_json::from_str(&body).map_err(|source| RemoteError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    fn get_once(&self, endpoint: &str) -> Result<String, RemoteError> {
        let url = format!("{}{}", self.api_base, endpoint);
        debug!("GET {}", url);

        let mut request = self
            .agent
            .get(&url)
            .header("Accept", ACCEPT)
            .header("User-Agent", USER_AGENT)
            .header("X-GitHub-Api-Version", API_VERSION);
        if let Some(token) = &self.token {
            request = request.header("Authorization", &format!("Bearer {token}"));
        }

        let transient = |e: ureq::Error| RemoteError::Transient {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        };

        let response = request.call().map_err(transient)?;
        let status = response.status().as_u16();
        let headers = QuotaHeaders::from_response(&response);
        self.record_quota(&headers);

        let body = response.into_body().read_to_string().map_err(transient)?;
        classify_response(status, endpoint, body, &headers)
    }
}

impl fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_base", &self.api_base)
            .field("slug", &self.slug)
            .field("authenticated", &self.token.is_some())
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

/// Rate-limit headers from a single response
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct QuotaHeaders {
    limit: Option<u64>,
    remaining: Option<u64>,
    reset_at: Option<DateTime<Utc>>,
}

impl QuotaHeaders {
    fn from_response(response: &ureq::http::Response<ureq::Body>) -> Self {
        let number = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
        };

        Self {
            limit: number("x-ratelimit-limit"),
            remaining: number("x-ratelimit-remaining"),
            reset_at: number("x-ratelimit-reset")
                .and_then(|secs| i64::try_from(secs).ok())
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        }
    }
}

/// Map an HTTP status to a body or a [`RemoteError`]
///
/// GitHub signals an exhausted quota with 403 as well as 429, so a 403 only
/// counts as an authentication failure when nothing points at rate limiting.
/// 422 is what the commit endpoints answer for an unknown SHA.
fn classify_response(
    status: u16,
    endpoint: &str,
    body: String,
    headers: &QuotaHeaders,
) -> Result<String, RemoteError> {
    match status {
        200..=299 => Ok(body),
        401 => Err(RemoteError::AuthFailure { status }),
        429 => Err(RemoteError::RateLimited {
            reset_at: headers.reset_at,
        }),
        403 if headers.remaining == Some(0) || body.to_lowercase().contains("rate limit") => {
            Err(RemoteError::RateLimited {
                reset_at: headers.reset_at,
            })
        }
        403 => Err(RemoteError::AuthFailure { status }),
        404 | 422 => Err(RemoteError::NotFound {
            resource: endpoint.to_string(),
        }),
        500..=599 => Err(RemoteError::Transient {
            endpoint: endpoint.to_string(),
            message: format!("HTTP {status}"),
        }),
        _ => Err(RemoteError::Http {
            status,
            endpoint: endpoint.to_string(),
            message: body.chars().take(200).collect(),
        }),
    }
}

impl ReleaseApi for GitHubClient {
    fn check_rate_limit(&self) -> Result<RateLimitStatus, RemoteError> {
        // `/rate_limit` does not count against the quota
        let response: RateLimitResponse = self.fetch_json("/rate_limit")?;
        let status = RateLimitStatus::from(response.resources.core);

        if let Ok(mut guard) = self.quota.lock() {
            *guard = Some(status);
        }
        debug!(
            "GitHub quota: {} remaining, resets {}",
            status.remaining,
            status.reset_at.to_rfc3339()
        );
        Ok(status)
    }

    fn resolve_tag(&self, name: &str) -> Result<String, RemoteError> {
        let tag = name.strip_prefix("refs/tags/").unwrap_or(name);
        let reference =
            self.get_json::<GitRefPayload>(&self.repo_path(&format!("git/ref/tags/{tag}")))?;
        let expected = format!("refs/tags/{tag}");
        if let Some(found) = reference.name.as_deref()
            && found != expected
        {
            return Err(RemoteError::NotFound {
                resource: format!("tag {tag} (server answered with {found})"),
            });
        }
        let mut object = reference.object;

        for _ in 0..MAX_TAG_PEEL {
            match object.kind.as_str() {
                "commit" => return Ok(object.sha),
                "tag" => {
                    object = self
                        .get_json::<GitRefPayload>(
                            &self.repo_path(&format!("git/tags/{}", object.sha)),
                        )?
                        .object;
                }
                other => {
                    return Err(RemoteError::NotFound {
                        resource: format!("tag {tag} points at a {other}, not a commit"),
                    });
                }
            }
        }

        Err(RemoteError::NotFound {
            resource: format!("tag {tag} (too many nested tag objects)"),
        })
    }

    fn compare_refs(&self, base: &str, head: &str) -> Result<Vec<CommitSummary>, RemoteError> {
        let mut commits = Vec::new();

        for page in 1..=MAX_COMPARE_PAGES {
            let endpoint = self.repo_path(&format!(
                "compare/{base}...{head}?per_page={COMPARE_PAGE_SIZE}&page={page}"
            ));
            let response: CompareResponse = self.get_json(&endpoint)?;
            let received = response.commits.len();
            commits.extend(response.commits.into_iter().map(CommitSummary::from));

            if received == 0 || commits.len() >= response.total_commits {
                return Ok(commits);
            }
        }

        warn!(
            "Compare {}...{} truncated at {} commits",
            base,
            head,
            commits.len()
        );
        Ok(commits)
    }

    fn get_commit(&self, sha: &str) -> Result<CommitSummary, RemoteError> {
        let payload: CommitPayload = self.get_json(&self.repo_path(&format!("commits/{sha}")))?;
        Ok(payload.into())
    }

    fn get_pull_request(&self, number: u64) -> Result<PullRequestDetail, RemoteError> {
        self.get_json(&self.repo_path(&format!("pulls/{number}")))
    }

    fn get_pull_requests_for_commit(&self, sha: &str) -> Result<Vec<PullRequestDetail>, RemoteError> {
        self.get_json(&self.repo_path(&format!("commits/{sha}/pulls")))
    }
}
