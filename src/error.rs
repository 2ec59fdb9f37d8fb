use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Phase of a search in which an upstream call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Listing,
    Fetching,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Listing => f.write_str("listing"),
            Stage::Fetching => f.write_str("fetching"),
        }
    }
}

/// Why a single call to the GitHub API (or a raw gist file host) failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamCause {
    #[error("timeout")]
    Timeout,

    #[error("rate limited{}", reset_suffix(.reset_at))]
    RateLimited { reset_at: Option<DateTime<Utc>> },

    #[error("HTTP {status}{}", message_suffix(.message))]
    Status { status: u16, message: Option<String> },

    #[error("network failure: {0}")]
    Network(String),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

fn reset_suffix(reset_at: &Option<DateTime<Utc>>) -> String {
    reset_at
        .map(|at| format!(" until {}", at.to_rfc3339()))
        .unwrap_or_default()
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl From<reqwest::Error> for UpstreamCause {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamCause::Timeout
        } else if err.is_decode() {
            UpstreamCause::MalformedPayload(err.to_string())
        } else {
            UpstreamCause::Network(err.to_string())
        }
    }
}

/// An upstream failure with enough context to act on from the logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("upstream error while {stage}{}: {cause}", gist_suffix(.gist_id))]
pub struct UpstreamError {
    pub stage: Stage,
    pub gist_id: Option<String>,
    #[source]
    pub cause: UpstreamCause,
}

fn gist_suffix(gist_id: &Option<String>) -> String {
    gist_id
        .as_deref()
        .map(|id| format!(" gist {id}"))
        .unwrap_or_default()
}

impl UpstreamError {
    pub fn listing(cause: UpstreamCause) -> Self {
        Self {
            stage: Stage::Listing,
            gist_id: None,
            cause,
        }
    }

    pub fn fetching(gist_id: impl Into<String>, cause: UpstreamCause) -> Self {
        Self {
            stage: Stage::Fetching,
            gist_id: Some(gist_id.into()),
            cause,
        }
    }
}

/// Failure to construct the GitHub client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid GitHub API base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Every way a search can end without a result.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Missing or malformed input, caught before any I/O.
    #[error("Invalid request, {reason}")]
    InvalidRequest { reason: String },

    /// The pattern does not compile under the `regex` grammar.
    #[error("Invalid pattern, {0}")]
    InvalidPattern(#[source] regex::Error),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// The request-level deadline fired; all in-flight calls were dropped.
    #[error("Search exceeded its deadline of {}s", .0.as_secs_f64())]
    DeadlineExceeded(Duration),
}

impl SearchError {
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        SearchError::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Validation failures are deterministic for a given input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SearchError::InvalidRequest { .. } | SearchError::InvalidPattern(_)
        )
    }
}
