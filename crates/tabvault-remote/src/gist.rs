//! Gist adapter for github.com and gitee.com
//!
//! Stores the serialized tab list as a single file inside a secret gist.
//! The two hosts share the endpoint shape (`GET/PATCH /gists/{id}`,
//! `POST /gists`) but differ in authentication: GitHub takes a bearer
//! token, Gitee an `access_token` query parameter.
//!
//! Both hosts truncate large file content in their gist responses. A
//! truncated payload is never returned to the caller; it surfaces as
//! [`RemoteError::Truncated`] so no merge runs against a partial list.

use std::collections::HashMap;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use tabvault_core::ports::remote_store::{RemoteError, RemoteStore};

/// File name of the tab list inside the gist
const GIST_FILE_NAME: &str = "tabvault.json";

/// Content cap the gist hosts apply before truncating file content
const GIST_CONTENT_LIMIT: usize = 1024 * 1024;

// ============================================================================
// GistHost
// ============================================================================

/// Which gist provider a client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GistHost {
    GitHub,
    Gitee,
}

impl GistHost {
    fn api_base(&self) -> &'static str {
        match self {
            GistHost::GitHub => "https://api.github.com",
            GistHost::Gitee => "https://gitee.com/api/v5",
        }
    }

    fn content_limit(&self) -> usize {
        GIST_CONTENT_LIMIT
    }
}

// ============================================================================
// Gist API response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct GistResponse {
    id: Option<String>,
    #[serde(default)]
    files: HashMap<String, GistFile>,
}

#[derive(Debug, Deserialize)]
struct GistFile {
    #[serde(default)]
    content: String,
    #[serde(default)]
    truncated: bool,
    #[serde(default)]
    size: usize,
}

// ============================================================================
// GistClient
// ============================================================================

/// `RemoteStore` adapter over one gist on one host
pub struct GistClient {
    client: Client,
    host: GistHost,
    base_url: String,
    access_token: String,
    gist_id: Option<String>,
}

impl GistClient {
    pub fn new(host: GistHost, access_token: impl Into<String>, gist_id: Option<String>) -> Self {
        Self {
            client: Client::new(),
            host,
            base_url: host.api_base().to_string(),
            access_token: access_token.into(),
            gist_id,
        }
    }

    /// Creates a client against a custom base URL (useful for testing).
    pub fn with_base_url(
        host: GistHost,
        access_token: impl Into<String>,
        gist_id: Option<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            host,
            base_url: base_url.into(),
            access_token: access_token.into(),
            gist_id,
        }
    }

    /// Builds an authenticated request for the host's auth scheme.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self
            .client
            .request(method, &url)
            .header("User-Agent", "tabvault")
            .header("Accept", "application/json");
        match self.host {
            GistHost::GitHub => builder.bearer_auth(&self.access_token),
            GistHost::Gitee => builder.query(&[("access_token", self.access_token.as_str())]),
        }
    }

    fn check_credential(&self) -> Result<(), RemoteError> {
        if self.access_token.is_empty() {
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

    fn files_payload(body: &str) -> serde_json::Value {
        json!({ GIST_FILE_NAME: { "content": body } })
    }
}

#[async_trait::async_trait]
impl RemoteStore for GistClient {
    async fn read(&self) -> Result<String, RemoteError> {
        self.check_credential()?;
        let Some(gist_id) = &self.gist_id else {
            // Nothing has been pushed from this side yet.
            return Err(RemoteError::NotFound);
        };

        debug!(host = ?self.host, gist = %gist_id, "fetching gist");
        let response = self
            .request(Method::GET, &format!("/gists/{gist_id}"))
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::map_status(response.status()));
        }

        let gist: GistResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::Api(format!("malformed gist response: {e}")))?;

        let Some(file) = gist.files.get(GIST_FILE_NAME) else {
            return Err(RemoteError::NotFound);
        };
        if file.truncated {
            return Err(RemoteError::Truncated {
                size: file.size,
                limit: self.host.content_limit(),
            });
        }
        Ok(file.content.clone())
    }

    async fn write(&self, body: &str) -> Result<Option<String>, RemoteError> {
        self.check_credential()?;
        let limit = self.host.content_limit();
        if body.len() > limit {
            return Err(RemoteError::TooLarge {
                size: body.len(),
                limit,
            });
        }

        match &self.gist_id {
            Some(gist_id) => {
                debug!(host = ?self.host, gist = %gist_id, "updating gist");
                let response = self
                    .request(Method::PATCH, &format!("/gists/{gist_id}"))
                    .json(&json!({ "files": Self::files_payload(body) }))
                    .send()
                    .await
                    .map_err(|e| RemoteError::Network(e.to_string()))?;

                if !response.status().is_success() {
                    return Err(Self::map_status(response.status()));
                }
                Ok(None)
            }
            None => {
                // First push from this side: create the gist and hand the
                // new id back so the caller can record it.
                info!(host = ?self.host, "creating gist for first push");
                let response = self
                    .request(Method::POST, "/gists")
                    .json(&json!({
                        "description": "tabvault tab list",
                        "public": false,
                        "files": Self::files_payload(body),
                    }))
                    .send()
                    .await
                    .map_err(|e| RemoteError::Network(e.to_string()))?;

                if !response.status().is_success() {
                    return Err(Self::map_status(response.status()));
                }
                let gist: GistResponse = response
                    .json()
                    .await
                    .map_err(|e| RemoteError::Api(format!("malformed gist response: {e}")))?;
                gist.id
                    .map(Some)
                    .ok_or_else(|| RemoteError::Api("created gist has no id".to_string()))
            }
        }
    }
}
