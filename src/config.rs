//! Environment-driven settings for the validator.
//!
//! Everything is resolved once at startup so the rest of the crate receives
//! plain values instead of reading the environment on its own.

use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Upper bound on a single releases request; there are no retries.
pub const RELEASE_TIMEOUT: Duration = Duration::from_secs(10);

const API_URL_VAR: &str = "ADDON_REGISTRY_API_URL";
const TOKEN_VAR: &str = "GITHUB_TOKEN";
const SKIP_REMOTE_VAR: &str = "ADDON_REGISTRY_SKIP_REMOTE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Base URL of the GitHub REST API, without a trailing slash.
    pub api_base: String,
    /// Optional token sent as a bearer credential with releases requests.
    pub token: Option<String>,
    /// Whether the remote release check runs at all.
    pub remote_checks: bool,
    pub timeout: Duration,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_URL.to_string(),
            token: None,
            remote_checks: true,
            timeout: RELEASE_TIMEOUT,
        }
    }
}

impl ValidatorConfig {
    /// Resolve settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve settings from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_base = lookup(API_URL_VAR)
            .map(|raw| raw.trim().trim_end_matches('/').to_string())
            .filter(|base| !base.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let token = lookup(TOKEN_VAR)
            .map(|raw| raw.trim().to_string())
            .filter(|token| !token.is_empty());
        let remote_checks = !flag_enabled(lookup(SKIP_REMOTE_VAR));

        Self {
            api_base,
            token,
            remote_checks,
            timeout: RELEASE_TIMEOUT,
        }
    }
}

// Unset, empty, and "0" all mean off.
fn flag_enabled(value: Option<String>) -> bool {
    value
        .map(|v| !v.trim().is_empty() && v.trim() != "0")
        .unwrap_or(false)
}
