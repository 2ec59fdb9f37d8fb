//! # Gist Searching
//!
//! A Rust library and HTTP service that searches a GitHub user's public gists
//! with a regular expression, fetching gist files concurrently and reporting
//! the gists that contain a match.
//!
//! ## Main Components
//!
//! - [`GistSearcher`]: Validates a search, lists the user's gists, scans their
//!   files and aggregates the matching gist URLs
//! - [`GistSource`] / [`GitHubClient`]: The upstream seam and its GitHub REST
//!   implementation
//! - [`server::router`]: The axum routes exposing `POST /api/v1/search`
//! - [`Args`]: Command line / environment configuration of the server
//!
//! ## Example
//!
//! ```no_run
//! use gist_searching_lib::{GistSearcher, SearchConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let searcher = GistSearcher::new(SearchConfig::default())?;
//!
//!     let result = searcher.search("octocat", "fn main").await?;
//!     for url in result.matches {
//!         println!("{url}");
//!     }
//!
//!     Ok(())
//! }
//! ```

mod args;
pub mod config;
pub mod error;
pub mod fetcher;
mod gist_searcher;
mod github_client;
pub mod lister;
pub mod matcher;
pub mod models;
pub mod server;

#[cfg(test)]
mod test_support;

// Re-export main components for documentation and external use
pub use crate::args::Args;
pub use crate::config::SearchConfig;
pub use crate::error::{ClientError, SearchError, Stage, UpstreamCause, UpstreamError};
pub use crate::gist_searcher::GistSearcher;
pub use crate::github_client::{GistSource, GitHubClient};
pub use crate::matcher::PatternMatcher;
pub use crate::models::{FileContent, FileRef, GistSummary, SearchRequest, SearchResult, SearchStatus};
