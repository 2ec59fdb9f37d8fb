use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use tracing::debug;

use crate::error::UpstreamError;
use crate::github_client::GistSource;
use crate::models::{FileContent, GistSummary};

/// Retrieve every file of `gist` with at most `concurrency` requests in
/// flight, yielding contents in completion order.
///
/// Dropping the stream cancels the retrievals still running.
pub fn fetch_stream<'a>(
    source: &'a dyn GistSource,
    gist: &'a GistSummary,
    concurrency: usize,
) -> impl Stream<Item = Result<FileContent, UpstreamError>> + Send + 'a {
    stream::iter(gist.files.values())
        .map(move |file| async move {
            debug!("Fetching '{}' of gist {}", file.filename, gist.id);
            source
                .fetch_raw(&file.raw_url)
                .await
                .map(|body| FileContent {
                    filename: file.filename.clone(),
                    body,
                })
                .map_err(|cause| UpstreamError::fetching(gist.id.as_str(), cause))
        })
        .buffer_unordered(concurrency.max(1))
}

/// Retrieve every file of `gist`. The first failed retrieval fails the whole
/// gist.
pub async fn fetch_files(
    source: &dyn GistSource,
    gist: &GistSummary,
    concurrency: usize,
) -> Result<Vec<FileContent>, UpstreamError> {
    fetch_stream(source, gist, concurrency).try_collect().await
}
