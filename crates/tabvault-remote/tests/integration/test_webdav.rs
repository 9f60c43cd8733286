//! Integration tests for the WebDAV adapter
//!
//! Verifies read/write round-trips, the MKCOL-and-retry path for a
//! missing parent collection, and the status-code error mapping.

use wiremock::matchers::{basic_auth, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tabvault_core::ports::remote_store::{RemoteError, RemoteStore};
use tabvault_remote::WebDavClient;

use crate::common;

#[tokio::test]
async fn test_read_returns_body_with_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tabvault/tabvault.json"))
        .and(basic_auth("user", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::webdav_client(&server);
    assert_eq!(client.read().await.expect("read failed"), "[]");
}

#[tokio::test]
async fn test_read_missing_file_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tabvault/tabvault.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = common::webdav_client(&server);
    assert!(matches!(client.read().await, Err(RemoteError::NotFound)));
}

#[tokio::test]
async fn test_rejected_credential_maps_to_auth() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/tabvault/tabvault.json"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = common::webdav_client(&server);
    assert!(matches!(client.write("[]").await, Err(RemoteError::Auth)));
}

#[tokio::test]
async fn test_write_put_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/tabvault/tabvault.json"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::webdav_client(&server);
    let pointer = client.write("[]").await.expect("write failed");
    assert_eq!(pointer, None, "WebDAV has no server-issued pointer");
}

#[tokio::test]
async fn test_write_creates_collection_on_conflict() {
    let server = MockServer::start().await;

    // First PUT hits a missing parent collection.
    Mock::given(method("PUT"))
        .and(path("/tabvault/tabvault.json"))
        .respond_with(ResponseTemplate::new(409))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("MKCOL"))
        .and(path("/tabvault"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    // Retry after MKCOL succeeds.
    Mock::given(method("PUT"))
        .and(path("/tabvault/tabvault.json"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::webdav_client(&server);
    client.write("[]").await.expect("write failed");
}

#[tokio::test]
async fn test_empty_endpoint_short_circuits() {
    let client = WebDavClient::new("", "user", "secret");
    assert!(matches!(
        client.read().await,
        Err(RemoteError::MissingCredential)
    ));
}
