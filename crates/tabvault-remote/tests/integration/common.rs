//! Shared test helpers for remote adapter integration tests
//!
//! Each helper mounts mock endpoints and returns a configured client
//! pointing at the mock server.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tabvault_remote::{GistClient, GistHost, WebDavClient};

/// Mounts `GET /gists/{id}` returning one gist with the tab list file.
pub async fn mount_gist(server: &MockServer, gist_id: &str, content: &str, truncated: bool) {
    Mock::given(method("GET"))
        .and(path(format!("/gists/{gist_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": gist_id,
            "files": {
                "tabvault.json": {
                    "content": content,
                    "truncated": truncated,
                    "size": content.len(),
                }
            }
        })))
        .mount(server)
        .await;
}

/// Returns a GitHub-flavored gist client bound to the mock server.
pub fn gist_client(server: &MockServer, gist_id: Option<&str>) -> GistClient {
    GistClient::with_base_url(
        GistHost::GitHub,
        "test-token",
        gist_id.map(str::to_string),
        server.uri(),
    )
}

/// Returns a WebDAV client bound to the mock server.
pub fn webdav_client(server: &MockServer) -> WebDavClient {
    WebDavClient::new(server.uri(), "user", "secret")
}
