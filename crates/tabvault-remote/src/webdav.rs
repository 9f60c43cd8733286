//! WebDAV adapter
//!
//! Stores the serialized tab list as one file on any WebDAV endpoint
//! with basic auth. Unlike the gist hosts, WebDAV applies no content
//! cap, so the adapter never reports truncation.
//!
//! A PUT into a missing collection fails with 409; the adapter issues a
//! MKCOL for the parent and retries the PUT once.

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use tracing::{debug, info};

use tabvault_core::ports::remote_store::{RemoteError, RemoteStore};

/// Path of the tab list file below the configured endpoint
const WEBDAV_FILE_PATH: &str = "tabvault/tabvault.json";

/// `RemoteStore` adapter over one WebDAV endpoint
pub struct WebDavClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl WebDavClient {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: Client::new(),
            base_url,
            username: username.into(),
            password: password.into(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        self.client
            .request(method, &url)
            .basic_auth(&self.username, Some(&self.password))
    }

    fn check_credential(&self) -> Result<(), RemoteError> {
        if self.base_url.is_empty() || self.username.is_empty() {
            return Err(RemoteError::MissingCredential);
        }
        Ok(())
    }

    fn map_status(status: StatusCode) -> RemoteError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteError::Auth,
            StatusCode::NOT_FOUND => RemoteError::NotFound,
            other => RemoteError::Api(format!("unexpected status {other}")),
        }
    }

    async fn put_once(&self, body: &str) -> Result<StatusCode, RemoteError> {
        let response = self
            .request(Method::PUT, WEBDAV_FILE_PATH)
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        Ok(response.status())
    }
}

#[async_trait::async_trait]
impl RemoteStore for WebDavClient {
    async fn read(&self) -> Result<String, RemoteError> {
        self.check_credential()?;
        debug!(endpoint = %self.base_url, "fetching tab list over WebDAV");

        let response = self
            .request(Method::GET, WEBDAV_FILE_PATH)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::map_status(response.status()));
        }
        response
            .text()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))
    }

    async fn write(&self, body: &str) -> Result<Option<String>, RemoteError> {
        self.check_credential()?;
        debug!(endpoint = %self.base_url, bytes = body.len(), "writing tab list over WebDAV");

        let mut status = self.put_once(body).await?;
        if status == StatusCode::CONFLICT {
            // Parent collection missing on first push; create it and retry.
            info!(endpoint = %self.base_url, "creating WebDAV collection");
            let mkcol = self
                .request(
                    Method::from_bytes(b"MKCOL").unwrap_or(Method::PUT),
                    "tabvault",
                )
                .send()
                .await
                .map_err(|e| RemoteError::Network(e.to_string()))?;
            if !mkcol.status().is_success() {
                return Err(Self::map_status(mkcol.status()));
            }
            status = self.put_once(body).await?;
        }

        if !status.is_success() {
            return Err(Self::map_status(status));
        }
        // The pointer is the configured path itself; nothing new to record.
        Ok(None)
    }
}
