use std::time::Duration;

use crate::Args;

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_USER_AGENT: &str = concat!("gist-searching/", env!("CARGO_PKG_VERSION"));
/// GitHub's own default page size for the gists endpoint.
pub const DEFAULT_PER_PAGE: u32 = 30;
pub const MAX_PER_PAGE: u32 = 100;
const DEFAULT_GIST_CONCURRENCY: usize = 4;
const DEFAULT_FILE_CONCURRENCY: usize = 8;
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Tunables for the gist client and the search orchestrator.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub api_base_url: String,
    pub user_agent: String,
    /// Sent as a bearer token to the API host only.
    pub token: Option<String>,
    pub per_page: u32,
    /// Stop listing after this many pages.
    pub max_pages: Option<u32>,
    /// Gists whose files are being fetched at the same time.
    pub gist_concurrency: usize,
    /// Files of one gist fetched at the same time.
    pub file_concurrency: usize,
    pub request_timeout: Duration,
    /// Deadline for a whole search, on top of the per-call timeout.
    pub search_timeout: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            token: None,
            per_page: DEFAULT_PER_PAGE,
            max_pages: None,
            gist_concurrency: DEFAULT_GIST_CONCURRENCY,
            file_concurrency: DEFAULT_FILE_CONCURRENCY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            search_timeout: None,
        }
    }
}

impl SearchConfig {
    /// Upper bound on file retrievals in flight for one search.
    pub fn max_in_flight(&self) -> usize {
        self.gist_concurrency.max(1) * self.file_concurrency.max(1)
    }
}

impl From<&Args> for SearchConfig {
    fn from(args: &Args) -> Self {
        let token = args
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        Self {
            api_base_url: args.api_base_url.trim_end_matches('/').to_string(),
            token,
            per_page: args.per_page,
            max_pages: args.max_pages,
            gist_concurrency: args.gist_concurrency,
            file_concurrency: args.file_concurrency,
            request_timeout: Duration::from_secs(args.request_timeout_secs),
            search_timeout: args.search_timeout_secs.map(Duration::from_secs),
            ..Self::default()
        }
    }
}
