use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::error::{ClientError, UpstreamCause};
use crate::models::GistSummary;

/// Where gist metadata and raw file content come from.
#[async_trait]
pub trait GistSource: Send + Sync {
    /// One page of `username`'s public gists, 1-based.
    async fn list_page(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<GistSummary>, UpstreamCause>;

    /// Raw bytes behind a gist file's `raw_url`.
    async fn fetch_raw(&self, raw_url: &str) -> Result<Bytes, UpstreamCause>;
}

/// [`GistSource`] backed by the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    api_base: Url,
    token: Option<String>,
}

#[derive(Deserialize)]
struct GitHubErrorBody {
    message: Option<String>,
}

impl GitHubClient {
    /// Build a client with the configured user agent and per-call timeout.
    pub fn new(config: &SearchConfig) -> Result<Self, ClientError> {
        // Validate the base URL up front
        let api_base = Url::parse(&config.api_base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ClientError::InvalidBaseUrl(config.api_base_url.clone()))?;

        // Headers sent with every request
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );

        // Build client; the timeout applies to each call
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(default_headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(GitHubClient {
            client,
            api_base,
            token: config.token.clone(),
        })
    }

    fn gists_url(&self, username: &str) -> Result<Url, UpstreamCause> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamCause::Network(format!("cannot-be-a-base URL: {}", self.api_base)))?
            .pop_if_empty()
            .extend(["users", username, "gists"]);
        Ok(url)
    }

    /// Turn a non-success response into its cause, reading GitHub's error
    /// message when the body carries one.
    async fn failure_cause(response: Response) -> UpstreamCause {
        let status = response.status();

        if matches!(status, StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS)
            && rate_limit_remaining(response.headers()) == Some(0)
        {
            return UpstreamCause::RateLimited {
                reset_at: rate_limit_reset(response.headers()),
            };
        }

        let message = response
            .json::<GitHubErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message);

        UpstreamCause::Status {
            status: status.as_u16(),
            message,
        }
    }
}

fn rate_limit_remaining(headers: &HeaderMap) -> Option<u32> {
    headers
        .get("X-RateLimit-Remaining")?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

fn rate_limit_reset(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    let reset = headers
        .get("X-RateLimit-Reset")?
        .to_str()
        .ok()?
        .parse::<i64>()
        .ok()?;
    DateTime::from_timestamp(reset, 0)
}

/// Log when the quota is spent; the next call will be refused upstream.
fn note_rate_limit(headers: &HeaderMap) {
    if rate_limit_remaining(headers) == Some(0) {
        match rate_limit_reset(headers) {
            Some(reset_at) => warn!(
                "GitHub rate limit exhausted, resets at {} ({}s from now)",
                reset_at.to_rfc3339(),
                (reset_at - Utc::now()).num_seconds().max(0)
            ),
            None => warn!("GitHub rate limit exhausted"),
        }
    }
}

#[async_trait]
impl GistSource for GitHubClient {
    async fn list_page(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<GistSummary>, UpstreamCause> {
        let url = self.gists_url(username)?;
        debug!("Requesting gists for '{}' page {} ({})", username, page, url);

        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github+json")
            .query(&[("page", page), ("per_page", per_page)]);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request.send().await?;
        note_rate_limit(response.headers());

        if !response.status().is_success() {
            return Err(Self::failure_cause(response).await);
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| UpstreamCause::MalformedPayload(e.to_string()))
    }

    async fn fetch_raw(&self, raw_url: &str) -> Result<Bytes, UpstreamCause> {
        debug!("Fetching raw file {}", raw_url);

        let response = self.client.get(raw_url).send().await?;
        if !response.status().is_success() {
            return Err(Self::failure_cause(response).await);
        }

        Ok(response.bytes().await?)
    }
}
