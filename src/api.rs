use std::collections::BTreeSet;
use std::time::Duration;

use chrono::Utc;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap};
use thiserror::Error;

use crate::types::Follower;

pub const DEFAULT_PER_PAGE: usize = 100;
const GITHUB_API: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("followtrack/", env!("CARGO_PKG_VERSION"));

/// Server-suggested waits (retry-after / x-ratelimit-reset) are honored
/// up to this cap; anything longer falls back to the capped value.
const SERVER_WAIT_CAP: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("authentication failed: GitHub rejected the token")]
    AuthenticationFailed,
    #[error("account '{0}' not found")]
    AccountNotFound(String),
    /// Recoverable: handled inside the fetch loop, never surfaced.
    #[error("rate limit exhausted")]
    RateLimited { retry_after: Option<Duration> },
    #[error("unexpected HTTP status {status} on page {page}")]
    Status { status: u16, page: u32 },
    #[error("malformed response on page {page}: {reason}")]
    MalformedResponse { page: u32, reason: String },
    #[error("request for page {page} failed: {source}")]
    Network {
        page: u32,
        #[source]
        source: reqwest::Error,
    },
}

/// Wait policy for rate-limited pages.
///
/// When the server names a reset time it is used directly (capped at
/// [`SERVER_WAIT_CAP`]). Otherwise waits start at `initial` and double
/// per consecutive rate-limit hit on the same page, capped at `max`.
/// Retries are unbounded in count; a successful page resets the backoff.
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    pub initial: Duration,
    pub max: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        BackoffPolicy {
            initial: Duration::from_secs(2),
            max: Duration::from_secs(120),
        }
    }
}

impl BackoffPolicy {
    pub fn delay(&self, consecutive_hits: u32) -> Duration {
        let factor = 2u32.saturating_pow(consecutive_hits);
        self.initial.saturating_mul(factor).min(self.max)
    }
}

/// One page of the follower list. Implemented by [`GithubClient`] for
/// the real API and by in-memory fakes in tests.
pub trait FollowerPages {
    fn fetch_page(&mut self, page: u32, per_page: usize) -> Result<Vec<Follower>, FetchError>;
}

/// Drives pagination to completion and returns the full follower set.
///
/// Pages are requested starting at 1; a page with fewer than `per_page`
/// entries is the end-of-list signal. `RateLimited` pages are retried
/// after a `sleep` per the backoff policy; every other error is fatal
/// and aborts the fetch. `on_page` fires once per successful page with
/// the page number and its entry count.
pub fn fetch_all(
    source: &mut impl FollowerPages,
    per_page: usize,
    backoff: &BackoffPolicy,
    sleep: &mut dyn FnMut(Duration),
    mut on_page: impl FnMut(u32, usize),
) -> Result<Vec<Follower>, FetchError> {
    let mut followers: Vec<Follower> = Vec::new();
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut page: u32 = 1;
    let mut consecutive_hits: u32 = 0;

    loop {
        match source.fetch_page(page, per_page) {
            Ok(batch) => {
                consecutive_hits = 0;
                let count = batch.len();
                for follower in batch {
                    // The list can shift between page requests; keep the
                    // first record seen per login.
                    if seen.insert(follower.login.clone()) {
                        followers.push(follower);
                    }
                }
                on_page(page, count);
                if count < per_page {
                    return Ok(followers);
                }
                page += 1;
            }
            Err(FetchError::RateLimited { retry_after }) => {
                let wait = match retry_after {
                    Some(d) => d.min(SERVER_WAIT_CAP),
                    None => backoff.delay(consecutive_hits),
                };
                consecutive_hits += 1;
                sleep(wait);
            }
            Err(err) => return Err(err),
        }
    }
}

/// Blocking client for the GitHub users API.
pub struct GithubClient {
    http: Client,
    base_url: String,
    login: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(login: &str, token: Option<String>) -> Result<Self, reqwest::Error> {
        Self::with_base_url(GITHUB_API, login, token)
    }

    /// Same as [`GithubClient::new`] with an overridable API root, so
    /// tests can point the client at a local fake server.
    pub fn with_base_url(
        base_url: &str,
        login: &str,
        token: Option<String>,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(GithubClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            login: login.to_string(),
            token,
        })
    }
}

impl FollowerPages for GithubClient {
    fn fetch_page(&mut self, page: u32, per_page: usize) -> Result<Vec<Follower>, FetchError> {
        let url = format!("{}/users/{}/followers", self.base_url, self.login);
        let mut req = self
            .http
            .get(&url)
            .query(&[("page", page.to_string()), ("per_page", per_page.to_string())]);
        if let Some(token) = &self.token {
            req = req.header(AUTHORIZATION, format!("token {token}"));
        }
        let resp = req
            .send()
            .map_err(|source| FetchError::Network { page, source })?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(FetchError::AuthenticationFailed);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::AccountNotFound(self.login.clone()));
        }
        if status == StatusCode::TOO_MANY_REQUESTS
            || (status == StatusCode::FORBIDDEN && rate_limit_exhausted(resp.headers()))
        {
            return Err(FetchError::RateLimited {
                retry_after: server_suggested_wait(resp.headers()),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                page,
            });
        }

        resp.json::<Vec<Follower>>()
            .map_err(|e| FetchError::MalformedResponse {
                page,
                reason: e.to_string(),
            })
    }
}

fn rate_limit_exhausted(headers: &HeaderMap) -> bool {
    headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0")
}

/// Reads the server's own wait suggestion: `retry-after` in seconds, or
/// `x-ratelimit-reset` as a unix timestamp relative to now.
fn server_suggested_wait(headers: &HeaderMap) -> Option<Duration> {
    if let Some(secs) = headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
    {
        return Some(Duration::from_secs(secs));
    }
    let reset = headers
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<i64>().ok())?;
    let wait = reset - Utc::now().timestamp();
    Some(Duration::from_secs(wait.max(1) as u64))
}
