//! HTTP surface of the gist search service.
//!
//! - `GET /ping` answers `pong`.
//! - `POST /api/v1/search` takes `{"username": ..., "pattern": ...}` and
//!   answers with a [`SearchResult`], or an [`ErrorResponse`] with a non-2xx
//!   status.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{error, info, warn};

use crate::error::SearchError;
use crate::gist_searcher::GistSearcher;
use crate::models::{ErrorResponse, SearchRequest, SearchResult};

const UPSTREAM_FAILURE_MESSAGE: &str = "Upstream GitHub API error. Please contact technical support.";

pub fn router(searcher: Arc<GistSearcher>) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/api/v1/search", post(search))
        .with_state(searcher)
}

async fn ping() -> &'static str {
    "pong"
}

async fn search(
    State(searcher): State<Arc<GistSearcher>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResult>, ApiError> {
    let Json(request) = payload?;
    info!("Search request for '{}' with pattern '{}'", request.username, request.pattern);

    match searcher.search(&request.username, &request.pattern).await {
        Ok(result) => Ok(Json(result)),
        Err(error) => Err(ApiError::Search {
            error,
            username: request.username,
            pattern: request.pattern,
        }),
    }
}

/// Failure of a request, rendered as an [`ErrorResponse`].
#[derive(Debug)]
pub enum ApiError {
    /// The body is not JSON, misses a field, or carries an unknown one.
    Body(JsonRejection),
    Search {
        error: SearchError,
        username: String,
        pattern: String,
    },
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Body(rejection)
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Body(_) => StatusCode::BAD_REQUEST,
            ApiError::Search { error, .. } if error.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Search { error, .. } => match error {
                SearchError::DeadlineExceeded(_) => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            ApiError::Body(rejection) => {
                warn!("Rejected search body: {}", rejection.body_text());
                ErrorResponse::new(rejection.body_text())
            }
            ApiError::Search {
                error,
                username,
                pattern,
            } => {
                let message = match &error {
                    SearchError::Upstream(upstream) => {
                        // details stay in the logs
                        error!(
                            username = %username,
                            stage = %upstream.stage,
                            gist_id = upstream.gist_id.as_deref().unwrap_or("-"),
                            "GitHub API error: {}",
                            upstream.cause
                        );
                        UPSTREAM_FAILURE_MESSAGE.to_string()
                    }
                    SearchError::DeadlineExceeded(_) => {
                        warn!(username = %username, "{}", error);
                        error.to_string()
                    }
                    _ => {
                        warn!(username = %username, "Client error: {}", error);
                        error.to_string()
                    }
                };

                ErrorResponse {
                    username: Some(username),
                    pattern: Some(pattern),
                    ..ErrorResponse::new(message)
                }
            }
        };

        (status, Json(body)).into_response()
    }
}
