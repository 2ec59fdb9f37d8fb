use tracing::{debug, info, warn};

use crate::config::MAX_PER_PAGE;
use crate::error::UpstreamError;
use crate::github_client::GistSource;
use crate::models::GistSummary;

/// List every public gist of `username`, following pagination until a page
/// comes back shorter than `per_page`.
///
/// `per_page` is clamped to `1..=MAX_PER_PAGE`, since GitHub silently caps
/// larger values and a short page would otherwise look like the last one.
///
/// Pages are concatenated in order. The first failing page aborts the
/// listing; no partial list is returned.
pub async fn list_gists(
    source: &dyn GistSource,
    username: &str,
    per_page: u32,
    max_pages: Option<u32>,
) -> Result<Vec<GistSummary>, UpstreamError> {
    let per_page = per_page.clamp(1, MAX_PER_PAGE);
    let mut gists = Vec::new();
    let mut page: u32 = 1;

    loop {
        // Fetch the current page
        let batch = source
            .list_page(username, page, per_page)
            .await
            .map_err(UpstreamError::listing)?;

        let count = batch.len();
        debug!("Listed {} gists for '{}' on page {}", count, username, page);
        gists.extend(batch);

        // A short page is the last one
        if count < per_page as usize {
            break;
        }

        // Check max page limit

        if let Some(max_page) = max_pages {
            if page >= max_page {
                warn!(
                    "Max page limit reached for '{}' (limit: {}), listing may be incomplete",
                    username, max_page
                );
                break;
            }
        }

        page += 1;
    }

    info!("Found {} gists for '{}' across {} pages", gists.len(), username, page);
    Ok(gists)
}
