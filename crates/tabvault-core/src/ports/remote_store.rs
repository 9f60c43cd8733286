//! Remote store port (driven/secondary port)
//!
//! Narrow contract over the two remote text-blob protocols the sync
//! subsystem consumes: Git-host gist APIs and WebDAV. Adapters read and
//! write raw text and map provider responses onto [`RemoteError`].
//!
//! The crucial part of the contract is the integrity signal: a provider
//! that caps or truncates content must surface [`RemoteError::Truncated`]
//! / [`RemoteError::TooLarge`] so the orchestrator can abort *before* any
//! merge touches local data.

use thiserror::Error;

/// Errors surfaced by remote store adapters
#[derive(Debug, Error)]
pub enum RemoteError {
    /// No credential is configured; no network call was attempted
    #[error("no credential configured")]
    MissingCredential,

    /// The remote rejected the credential (401/403)
    #[error("authentication rejected by remote")]
    Auth,

    /// The remote has no content at the configured location (404, or no
    /// gist id recorded yet)
    #[error("remote content not found")]
    NotFound,

    /// The remote returned truncated content; the payload must not be used
    #[error("remote content truncated ({size} bytes, cap {limit})")]
    Truncated {
        /// Bytes actually received
        size: usize,
        /// The provider's content cap
        limit: usize,
    },

    /// The payload to write exceeds the provider's size cap
    #[error("payload too large ({size} bytes, cap {limit})")]
    TooLarge {
        /// Bytes attempted
        size: usize,
        /// The provider's content cap
        limit: usize,
    },

    /// Network-level failure (DNS, connect, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// Unexpected provider response (bad status, malformed body)
    #[error("remote API error: {0}")]
    Api(String),
}

impl RemoteError {
    /// True for the integrity conditions that must abort a merge.
    pub fn is_integrity_error(&self) -> bool {
        matches!(
            self,
            RemoteError::Truncated { .. } | RemoteError::TooLarge { .. }
        )
    }
}

/// Port trait for one remote text-blob destination
///
/// One instance is bound to one remote target (its credential, endpoint,
/// and remote pointer). The orchestrator only ever sees raw text.
#[async_trait::async_trait]
pub trait RemoteStore: Send + Sync {
    /// Reads the remote payload as raw text.
    async fn read(&self) -> Result<String, RemoteError>;

    /// Writes the payload, creating the remote resource when needed.
    ///
    /// Returns the remote pointer (e.g. a freshly created gist id) when
    /// the write established one; `None` when the existing pointer still
    /// holds.
    async fn write(&self, body: &str) -> Result<Option<String>, RemoteError>;
}
