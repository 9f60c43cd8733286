//! Integration tests for the gist adapter
//!
//! Verifies content retrieval, truncation detection, gist creation on
//! first push, and the status-code error mapping.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tabvault_core::ports::remote_store::{RemoteError, RemoteStore};
use tabvault_remote::{GistClient, GistHost};

use crate::common;

#[tokio::test]
async fn test_read_returns_file_content() {
    let server = MockServer::start().await;
    common::mount_gist(&server, "g-1", r#"[{"name":"Staging"}]"#, false).await;

    let client = common::gist_client(&server, Some("g-1"));
    let content = client.read().await.expect("read failed");
    assert_eq!(content, r#"[{"name":"Staging"}]"#);
}

#[tokio::test]
async fn test_read_truncated_content_is_rejected() {
    let server = MockServer::start().await;
    common::mount_gist(&server, "g-1", "partial", true).await;

    let client = common::gist_client(&server, Some("g-1"));
    let err = client.read().await.unwrap_err();
    assert!(matches!(err, RemoteError::Truncated { .. }));
    assert!(err.is_integrity_error());
}

#[tokio::test]
async fn test_read_without_pointer_is_not_found() {
    let server = MockServer::start().await;
    let client = common::gist_client(&server, None);
    assert!(matches!(client.read().await, Err(RemoteError::NotFound)));
}

#[tokio::test]
async fn test_read_maps_auth_statuses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gists/g-1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = common::gist_client(&server, Some("g-1"));
    assert!(matches!(client.read().await, Err(RemoteError::Auth)));
}

#[tokio::test]
async fn test_read_missing_gist_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gists/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = common::gist_client(&server, Some("gone"));
    assert!(matches!(client.read().await, Err(RemoteError::NotFound)));
}

#[tokio::test]
async fn test_empty_token_short_circuits() {
    let server = MockServer::start().await;
    let client =
        GistClient::with_base_url(GistHost::GitHub, "", Some("g-1".to_string()), server.uri());

    // No mock mounted: the adapter must not reach the network at all.
    assert!(matches!(
        client.read().await,
        Err(RemoteError::MissingCredential)
    ));
    assert!(matches!(
        client.write("[]").await,
        Err(RemoteError::MissingCredential)
    ));
}

#[tokio::test]
async fn test_write_updates_existing_gist() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/gists/g-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "g-1",
            "files": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::gist_client(&server, Some("g-1"));
    let pointer = client.write("[]").await.expect("write failed");
    assert_eq!(pointer, None, "existing pointer still holds");
}

#[tokio::test]
async fn test_write_without_pointer_creates_gist() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gists"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": "fresh-gist",
            "files": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::gist_client(&server, None);
    let pointer = client.write("[]").await.expect("write failed");
    assert_eq!(pointer.as_deref(), Some("fresh-gist"));
}

#[tokio::test]
async fn test_write_oversized_payload_is_rejected_before_sending() {
    let server = MockServer::start().await;
    let client = common::gist_client(&server, Some("g-1"));

    let oversized = "x".repeat(2 * 1024 * 1024);
    let err = client.write(&oversized).await.unwrap_err();
    assert!(matches!(err, RemoteError::TooLarge { .. }));
}

#[tokio::test]
async fn test_gitee_uses_query_parameter_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gists/g-9"))
        .and(wiremock::matchers::query_param("access_token", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "g-9",
            "files": {
                "tabvault.json": { "content": "[]", "truncated": false, "size": 2 }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client =
        GistClient::with_base_url(GistHost::Gitee, "tok", Some("g-9".to_string()), server.uri());
    assert_eq!(client.read().await.expect("read failed"), "[]");
}

#[tokio::test]
async fn test_read_ignores_unrelated_files() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gists/g-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "g-1",
            "files": {
                "notes.md": { "content": "unrelated", "truncated": false, "size": 9 }
            }
        })))
        .mount(&server)
        .await;

    let client = common::gist_client(&server, Some("g-1"));
    assert!(matches!(client.read().await, Err(RemoteError::NotFound)));
}
