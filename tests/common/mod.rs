//! Fake GitHub gist payloads and mock mounting for the integration tests.

#![allow(dead_code)]

use std::time::Duration;

use gist_searching_lib::{GistSearcher, SearchConfig};
use serde_json::{json, Map, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn raw_path(gist_id: &str, filename: &str) -> String {
    format!("/raw/{gist_id}/{filename}")
}

pub fn html_url(gist_id: &str) -> String {
    format!("https://gist.github.com/{gist_id}")
}

/// A gist object shaped like the `GET /users/{username}/gists` payload.
pub fn fake_gist(server: &MockServer, username: &str, gist_id: &str, filenames: &[&str]) -> Value {
    let files: Map<String, Value> = filenames
        .iter()
        .map(|filename| {
            (
                filename.to_string(),
                json!({
                    "filename": filename,
                    "type": "text/plain",
                    "language": "Text",
                    "raw_url": format!("{}{}", server.uri(), raw_path(gist_id, filename)),
                    "size": 75
                }),
            )
        })
        .collect();

    json!({
        "url": format!("https://api.github.com/gists/{gist_id}"),
        "forks_url": format!("https://api.github.com/gists/{gist_id}/forks"),
        "id": gist_id,
        "node_id": "G_kwDOACkMq9oAIDQ4ZjdmMGFlNDQwOWQwOWE3MDM2MThkZDkyNjVhZDg3",
        "git_pull_url": format!("https://gist.github.com/{gist_id}.git"),
        "html_url": html_url(gist_id),
        "files": files,
        "public": true,
        "created_at": "2023-03-03T12:54:32Z",
        "updated_at": "2023-03-03T12:54:32Z",
        "description": "",
        "comments": 0,
        "user": null,
        "owner": {
            "login": username,
            "id": 2690219,
            "type": "User",
            "site_admin": false
        },
        "truncated": false
    })
}

/// Serve `gists` as listing page `page`, expecting exactly one request.
pub async fn mount_page(server: &MockServer, username: &str, page: u32, gists: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(format!("/users/{username}/gists")))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(gists)))
        .expect(1)
        .mount(server)
        .await;
}

/// Fail the test if listing page `page` is ever requested.
pub async fn forbid_page(server: &MockServer, username: &str, page: u32) {
    Mock::given(method("GET"))
        .and(path(format!("/users/{username}/gists")))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(server)
        .await;
}

pub async fn mount_file(server: &MockServer, gist_id: &str, filename: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(raw_path(gist_id, filename)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

pub fn config_for(server: &MockServer) -> SearchConfig {
    SearchConfig {
        api_base_url: server.uri(),
        request_timeout: Duration::from_secs(2),
        ..SearchConfig::default()
    }
}

pub fn searcher_for(server: &MockServer) -> GistSearcher {
    GistSearcher::new(config_for(server)).expect("client builds")
}
