//! Remote release check: does the declared repository exist and has it
//! shipped at least one release?
//!
//! The network sits behind [`ReleaseSource`] so the status mapping in
//! [`check_releases`] can be exercised without a live GitHub. A
//! forbidden/rate-limited answer is reported as unverified, never as a
//! failure: platform limits must not fail an otherwise-correct submission.

use crate::config::ValidatorConfig;
use anyhow::Context;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde_json::Value;
use std::time::Duration;

/// Media type requested from the releases endpoint.
pub const RELEASES_ACCEPT: &str = "application/vnd.github.v3+json";

const USER_AGENT: &str = concat!("addon-registry/", env!("CARGO_PKG_VERSION"));

/// Status code and decoded body of a releases request.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseResponse {
    pub status: u16,
    /// `None` when the body was not valid JSON.
    pub body: Option<Value>,
}

/// Transport-level failure; no HTTP status was received.
#[derive(Debug, thiserror::Error)]
pub enum ReleaseLookupError {
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("{0}")]
    Transport(String),
}

pub trait ReleaseSource {
    /// List releases for an `owner/repo` string already known to be well formed.
    fn fetch_releases(&self, repo: &str) -> Result<ReleaseResponse, ReleaseLookupError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseCheck {
    Verified,
    /// The repository is missing, has no releases, or could not be queried.
    Failed(String),
    /// GitHub refused to answer; nothing is known about the repository.
    Unverified(String),
}

/// Query `source` once and map the outcome to a check result.
pub fn check_releases(source: &dyn ReleaseSource, repo: &str) -> ReleaseCheck {
    match source.fetch_releases(repo) {
        Ok(response) => classify(repo, &response),
        Err(err) => ReleaseCheck::Failed(format!("Error checking releases for '{repo}': {err}")),
    }
}

fn classify(repo: &str, response: &ReleaseResponse) -> ReleaseCheck {
    match response.status {
        200..=299 => match &response.body {
            Some(Value::Array(releases)) if !releases.is_empty() => ReleaseCheck::Verified,
            Some(Value::Array(_)) => {
                ReleaseCheck::Failed(format!("Repository '{repo}' exists but has no releases"))
            }
            _ => ReleaseCheck::Failed(format!(
                "Unexpected response when fetching releases for '{repo}'"
            )),
        },
        404 => ReleaseCheck::Failed(format!("Repository '{repo}' not found on GitHub")),
        403 | 429 => ReleaseCheck::Unverified(format!(
            "Could not verify releases for '{repo}': GitHub API access forbidden or rate limited (status {})",
            response.status
        )),
        code => ReleaseCheck::Failed(format!(
            "Failed to fetch releases for '{repo}', status {code}"
        )),
    }
}

/// Blocking client for `GET /repos/{owner}/{repo}/releases`.
pub struct GithubReleases {
    client: Client,
    api_base: String,
    token: Option<String>,
    timeout: Duration,
}

impl GithubReleases {
    pub fn new(config: &ValidatorConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("building GitHub API client")?;
        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            token: config.token.clone(),
            timeout: config.timeout,
        })
    }

    pub fn releases_url(&self, repo: &str) -> String {
        format!("{}/repos/{repo}/releases", self.api_base)
    }

    fn lookup_error(&self, err: &reqwest::Error) -> ReleaseLookupError {
        if err.is_timeout() {
            return ReleaseLookupError::Timeout(self.timeout);
        }
        ReleaseLookupError::Transport(error_chain(err))
    }
}

impl ReleaseSource for GithubReleases {
    fn fetch_releases(&self, repo: &str) -> Result<ReleaseResponse, ReleaseLookupError> {
        let mut request = self
            .client
            .get(self.releases_url(repo))
            .header(ACCEPT, RELEASES_ACCEPT);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|err| self.lookup_error(&err))?;
        let status = response.status().as_u16();
        let text = response.text().map_err(|err| self.lookup_error(&err))?;
        Ok(ReleaseResponse {
            status,
            body: serde_json::from_str(&text).ok(),
        })
    }
}

// reqwest's top-level message hides the cause (DNS, refused, TLS).
fn error_chain(err: &reqwest::Error) -> String {
    let mut text = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = std::error::Error::source(cause);
    }
    text
}
