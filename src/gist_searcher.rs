use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, instrument};

use crate::config::SearchConfig;
use crate::error::{ClientError, SearchError, UpstreamError};
use crate::fetcher::fetch_stream;
use crate::github_client::{GistSource, GitHubClient};
use crate::lister::list_gists;
use crate::matcher::PatternMatcher;
use crate::models::{GistSummary, SearchResult};

/// Longest login GitHub accepts.
const MAX_USERNAME_LEN: usize = 39;

/// Searches a user's gists for a pattern.
///
/// A search validates its input, lists the user's gists page by page, then
/// scans the gists concurrently. Any upstream failure ends the whole search
/// with an error; partial match lists are never returned.
pub struct GistSearcher {
    source: Arc<dyn GistSource>,
    config: SearchConfig,
}

impl GistSearcher {
    /// Create a searcher talking to the GitHub API.
    pub fn new(config: SearchConfig) -> Result<Self, ClientError> {
        let client = GitHubClient::new(&config)?;
        Ok(Self::with_source(Arc::new(client), config))
    }

    pub fn with_source(source: Arc<dyn GistSource>, config: SearchConfig) -> Self {
        GistSearcher { source, config }
    }

    /// Run one search. Invalid input is rejected before any upstream call.
    #[instrument(skip_all, fields(username = %username, pattern = %pattern))]
    pub async fn search(&self, username: &str, pattern: &str) -> Result<SearchResult, SearchError> {
        let username = validate_username(username)?;
        let matcher = PatternMatcher::compile(pattern)?;

        let scan = self.scan(username, &matcher);
        let matches = match self.config.search_timeout {
            Some(limit) => tokio::time::timeout(limit, scan)
                .await
                .map_err(|_| SearchError::DeadlineExceeded(limit))??,
            None => scan.await?,
        };

        Ok(SearchResult::success(
            username.to_string(),
            pattern.to_string(),
            matches,
        ))
    }

    async fn scan(&self, username: &str, matcher: &PatternMatcher) -> Result<Vec<String>, SearchError> {
        // List every gist first, page by page
        debug!("Listing gists for '{}'", username);
        let gists = list_gists(
            self.source.as_ref(),
            username,
            self.config.per_page,
            self.config.max_pages,
        )
        .await?;

        if gists.is_empty() {
            info!("'{}' has no public gists", username);
            return Ok(Vec::new());
        }

        // One pipeline per gist, tagged with its listing index
        debug!("Scanning {} gists of '{}'", gists.len(), username);
        let pipelines: Vec<_> = gists
            .iter()
            .enumerate()
            .map(|(index, gist)| async move {
                self.gist_matches(gist, matcher)
                    .await
                    .map(|found| (index, found))
            })
            .collect();

        // Run them with bounded concurrency; the first error drops the rest
        let verdicts: Vec<(usize, bool)> = stream::iter(pipelines)
            .buffer_unordered(self.config.gist_concurrency.max(1))
            .try_collect()
            .await?;

        // Restore listing order and deduplicate
        let matches = collect_matches(&gists, verdicts);
        info!(
            "Pattern '{}' matched {} of {} gists for '{}'",
            matcher.as_str(),
            matches.len(),
            gists.len(),
            username
        );
        Ok(matches)
    }

    /// True once any file of the gist matches; remaining retrievals are
    /// dropped at that point.
    async fn gist_matches(&self, gist: &GistSummary, matcher: &PatternMatcher) -> Result<bool, UpstreamError> {
        let mut contents = std::pin::pin!(fetch_stream(
            self.source.as_ref(),
            gist,
            self.config.file_concurrency,
        ));

        while let Some(file) = contents.next().await {
            let file = file?;
            if matcher.matches_file(&file) {
                debug!("Gist {} matched in '{}'", gist.id, file.filename);
                return Ok(true);
            }
            if file.text().is_none() {
                debug!("Skipping binary file '{}' of gist {}", file.filename, gist.id);
            }
        }

        Ok(false)
    }
}

/// Restore listing order and keep each matching URL once.
fn collect_matches(gists: &[GistSummary], mut verdicts: Vec<(usize, bool)>) -> Vec<String> {
    verdicts.sort_unstable_by_key(|(index, _)| *index);

    let mut seen = HashSet::new();
    verdicts
        .into_iter()
        .filter(|(_, found)| *found)
        .filter_map(|(index, _)| gists.get(index))
        .filter(|gist| seen.insert(gist.url.as_str()))
        .map(|gist| gist.url.clone())
        .collect()
}

fn validate_username(username: &str) -> Result<&str, SearchError> {
    let username = username.trim();

    if username.is_empty() {
        return Err(SearchError::invalid_request("'username' must not be empty"));
    }
    if username.len() > MAX_USERNAME_LEN {
        return Err(SearchError::invalid_request(format!(
            "'username' is longer than {} characters",
            MAX_USERNAME_LEN
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(SearchError::invalid_request(
            "'username' may only contain alphanumeric characters or hyphens",
        ));
    }

    Ok(username)
}
