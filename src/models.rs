use std::collections::BTreeMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One entry of a user's gist listing, as returned by
/// `GET /users/{username}/gists`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GistSummary {
    pub id: String,
    /// The user-facing gist page.
    #[serde(rename = "html_url")]
    pub url: String,
    #[serde(default)]
    pub files: BTreeMap<String, FileRef>,
}

/// Pointer to the raw content of a single gist file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileRef {
    pub filename: String,
    pub raw_url: String,
}

/// The downloaded body of one gist file. Lives only until it is matched.
#[derive(Debug, Clone)]
pub struct FileContent {
    pub filename: String,
    pub body: Bytes,
}

impl FileContent {
    /// Body as UTF-8 text, or `None` for binary content.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// Body of `POST /api/v1/search`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchRequest {
    pub username: String,
    pub pattern: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    Success,
    Error,
}

/// Outcome of a completed search.
///
/// `matches` holds each matching gist URL once, in listing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub status: SearchStatus,
    pub username: String,
    pub pattern: String,
    pub matches: Vec<String>,
}

impl SearchResult {
    pub fn success(username: String, pattern: String, matches: Vec<String>) -> Self {
        Self {
            status: SearchStatus::Success,
            username,
            pattern,
            matches,
        }
    }
}

/// JSON body returned with every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: SearchStatus,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            status: SearchStatus::Error,
            error: error.into(),
            username: None,
            pattern: None,
        }
    }
}
