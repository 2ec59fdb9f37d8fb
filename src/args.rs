use std::net::SocketAddr;

use clap::Parser;

/// Gist search service: finds which of a GitHub user's public gists contain
/// a regular expression.
#[derive(Debug, Parser)]
#[clap(
    author,
    version,
    about,
    long_about = "HTTP service that lists a GitHub user's public gists, fetches every file concurrently and reports the gists whose content matches a regular expression."
)]
pub struct Args {
    /// Address the HTTP server listens on.
    #[clap(long, env = "GIST_SEARCH_BIND", default_value = "0.0.0.0:9876")]
    pub bind: SocketAddr,

    /// GitHub API token, raises the upstream rate limit when set.
    #[clap(short, long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Base URL of the GitHub REST API.
    #[clap(long, env = "GITHUB_API_URL", default_value = crate::config::DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    /// Gists requested per listing page.
    #[clap(long, default_value_t = crate::config::DEFAULT_PER_PAGE,
        value_parser = clap::value_parser!(u32).range(1..=crate::config::MAX_PER_PAGE as i64))]
    pub per_page: u32,

    /// Maximum number of listing pages to retrieve per search.
    #[clap(short = 'p', long, value_name = "NUM",
        value_parser = clap::value_parser!(u32).range(1..))]
    pub max_pages: Option<u32>,

    /// Maximum number of gists scanned concurrently.
    #[clap(short = 'c', long, default_value = "4")]
    pub gist_concurrency: usize,

    /// Maximum number of files of one gist fetched concurrently.
    #[clap(long, default_value = "8")]
    pub file_concurrency: usize,

    /// Timeout for each upstream call, in seconds.
    #[clap(long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..))]
    pub request_timeout_secs: u64,

    /// Deadline for a whole search, in seconds.
    #[clap(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub search_timeout_secs: Option<u64>,
}
