//! In-memory `GistSource` used by the unit tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::UpstreamCause;
use crate::github_client::GistSource;
use crate::models::{FileRef, GistSummary};

pub fn raw_url(gist_id: &str, filename: &str) -> String {
    format!("https://gist.githubusercontent.com/stub/{gist_id}/raw/{filename}")
}

pub fn gist(id: &str, filenames: &[&str]) -> GistSummary {
    let files = filenames
        .iter()
        .map(|name| {
            (
                name.to_string(),
                FileRef {
                    filename: name.to_string(),
                    raw_url: raw_url(id, name),
                },
            )
        })
        .collect::<BTreeMap<_, _>>();

    GistSummary {
        id: id.to_string(),
        url: format!("https://gist.github.com/{id}"),
        files,
    }
}

#[derive(Default)]
pub struct StubSource {
    pages: HashMap<String, Vec<Vec<GistSummary>>>,
    failing_pages: HashMap<u32, UpstreamCause>,
    files: HashMap<String, Result<Bytes, UpstreamCause>>,
    delays: HashMap<String, Duration>,
    listed: Mutex<Vec<(u32, u32)>>,
    fetched: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

/// Counts one retrieval as in flight until dropped, so cancelled ones are
/// released too.
struct InFlight<'a> {
    current: &'a AtomicUsize,
}

impl<'a> InFlight<'a> {
    fn enter(current: &'a AtomicUsize, peak: &AtomicUsize) -> Self {
        let now = current.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        Self { current }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next page of `username`'s listing.
    pub fn with_page(mut self, username: &str, gists: Vec<GistSummary>) -> Self {
        self.pages.entry(username.to_string()).or_default().push(gists);
        self
    }

    pub fn failing_page(mut self, page: u32, cause: UpstreamCause) -> Self {
        self.failing_pages.insert(page, cause);
        self
    }

    pub fn with_file(mut self, gist_id: &str, filename: &str, body: impl Into<Bytes>) -> Self {
        self.files
            .insert(raw_url(gist_id, filename), Ok(body.into()));
        self
    }

    pub fn failing_file(mut self, gist_id: &str, filename: &str, cause: UpstreamCause) -> Self {
        self.files.insert(raw_url(gist_id, filename), Err(cause));
        self
    }

    /// Hold back the response for one file.
    pub fn delayed(mut self, gist_id: &str, filename: &str, delay: Duration) -> Self {
        self.delays.insert(raw_url(gist_id, filename), delay);
        self
    }

    pub fn listed_pages(&self) -> Vec<u32> {
        self.listed.lock().unwrap().iter().map(|(page, _)| *page).collect()
    }

    /// The `per_page` value sent with each listing request.
    pub fn listed_page_sizes(&self) -> Vec<u32> {
        self.listed.lock().unwrap().iter().map(|(_, size)| *size).collect()
    }

    pub fn fetched_urls(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    /// Highest number of file retrievals observed running at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn call_count(&self) -> usize {
        self.listed.lock().unwrap().len() + self.fetched.lock().unwrap().len()
    }
}

#[async_trait]
impl GistSource for StubSource {
    async fn list_page(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<GistSummary>, UpstreamCause> {
        self.listed.lock().unwrap().push((page, per_page));

        if let Some(cause) = self.failing_pages.get(&page) {
            return Err(cause.clone());
        }

        Ok(self
            .pages
            .get(username)
            .and_then(|pages| pages.get(page as usize - 1))
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_raw(&self, raw_url: &str) -> Result<Bytes, UpstreamCause> {
        self.fetched.lock().unwrap().push(raw_url.to_string());
        let _guard = InFlight::enter(&self.in_flight, &self.peak_in_flight);

        if let Some(delay) = self.delays.get(raw_url) {
            tokio::time::sleep(*delay).await;
        }

        self.files.get(raw_url).cloned().unwrap_or(Err(UpstreamCause::Status {
            status: 404,
            message: Some("Not Found".to_string()),
        }))
    }
}
