//! Per-target synchronization metadata
//!
//! A *remote target* is one configured sync destination: the GitHub gist
//! backend, the Gitee gist backend, or a named WebDAV connection. Each
//! target carries its own credential config, bounded result history, and
//! transient status.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of history entries kept per target; older entries are
/// evicted when new results are appended.
pub const SYNC_HISTORY_LIMIT: usize = 50;

// ============================================================================
// RemoteTarget
// ============================================================================

/// Identity of one configured sync destination
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RemoteTarget {
    /// Gist storage on github.com
    GithubGist,
    /// Gist storage on gitee.com
    GiteeGist,
    /// A named WebDAV connection
    WebDav(String),
}

impl RemoteTarget {
    /// Stable key used in persistence (`sync:config:<key>`, `sync:result:<key>`).
    pub fn key(&self) -> String {
        match self {
            RemoteTarget::GithubGist => "github".to_string(),
            RemoteTarget::GiteeGist => "gitee".to_string(),
            RemoteTarget::WebDav(name) => format!("webdav:{name}"),
        }
    }
}

impl fmt::Display for RemoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

// ============================================================================
// SyncType / SyncOutcome / FailureReason
// ============================================================================

/// What initiated a sync and which policy it runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncType {
    /// Timer-triggered; behaves like a pull-merge followed by a push
    Auto,
    /// User-triggered: fetch remote, merge into local, push result
    ManualPullMerge,
    /// User-triggered: remote replaces local entirely
    ManualPullForce,
    /// User-triggered: fetch remote, merge local into it, push result
    ManualPushMerge,
    /// User-triggered: local replaces remote entirely
    ManualPushForce,
}

/// Whether a sync attempt succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncOutcome {
    Success,
    Failure,
}

/// Why a sync attempt failed
///
/// Not exhaustive for callers: new reasons may be added as adapters grow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum FailureReason {
    /// No credential configured for the target; no network call was made
    MissingCredential,
    /// The remote rejected the credential
    Auth,
    /// Network-level failure reaching the remote
    Network,
    /// The remote returned truncated content; merge was aborted
    Truncated,
    /// The payload exceeds the remote's size cap
    TooLarge,
    /// The remote holds no usable content to pull
    RemoteEmpty,
    /// The remote payload could not be parsed, or local state could not
    /// be serialized
    Serialization,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureReason::MissingCredential => "missing credential",
            FailureReason::Auth => "authentication rejected",
            FailureReason::Network => "network error",
            FailureReason::Truncated => "remote content truncated",
            FailureReason::TooLarge => "content too large",
            FailureReason::RemoteEmpty => "remote is empty",
            FailureReason::Serialization => "serialization error",
        };
        f.write_str(s)
    }
}

// ============================================================================
// SyncResultItem / SyncHistory
// ============================================================================

/// One recorded sync attempt. Created only by the orchestrator, never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResultItem {
    pub sync_time: DateTime<Utc>,
    pub sync_type: SyncType,
    pub outcome: SyncOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
}

impl SyncResultItem {
    /// Records a successful attempt at the current time.
    pub fn success(sync_type: SyncType) -> Self {
        Self {
            sync_time: Utc::now(),
            sync_type,
            outcome: SyncOutcome::Success,
            reason: None,
        }
    }

    /// Records a failed attempt at the current time.
    pub fn failure(sync_type: SyncType, reason: FailureReason) -> Self {
        Self {
            sync_time: Utc::now(),
            sync_type,
            outcome: SyncOutcome::Failure,
            reason: Some(reason),
        }
    }
}

/// Newest-first bounded history of sync attempts for one target
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncHistory {
    pub items: Vec<SyncResultItem>,
}

impl SyncHistory {
    /// Prepends a result and trims the history to [`SYNC_HISTORY_LIMIT`].
    pub fn record(&mut self, item: SyncResultItem) {
        self.items.insert(0, item);
        self.items.truncate(SYNC_HISTORY_LIMIT);
    }

    /// The most recent result, if any.
    pub fn latest(&self) -> Option<&SyncResultItem> {
        self.items.first()
    }
}

// ============================================================================
// SyncStatus
// ============================================================================

/// Transient per-target status. Not persisted across restarts; every
/// target starts `Idle` on load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Idle,
    Syncing,
}

// ============================================================================
// Credentials / target config
// ============================================================================

/// Credential for a remote target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Credential {
    /// Personal access token for a gist API
    AccessToken(String),
    /// WebDAV endpoint with basic auth
    WebDav {
        url: String,
        username: String,
        password: String,
    },
}

impl Credential {
    /// True when the credential carries usable secrets.
    pub fn is_usable(&self) -> bool {
        match self {
            Credential::AccessToken(token) => !token.is_empty(),
            Credential::WebDav { url, username, .. } => !url.is_empty() && !username.is_empty(),
        }
    }
}

/// Persisted configuration of one remote target
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncTargetConfig {
    /// Credential; `None` until the user configures the target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<Credential>,
    /// Last-known remote pointer (gist id, or WebDAV file path)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_pointer: Option<String>,
    /// Whether the auto-sync timer should include this target
    #[serde(default)]
    pub auto_sync: bool,
}

impl SyncTargetConfig {
    /// True when the target can attempt a sync at all.
    pub fn has_usable_credential(&self) -> bool {
        self.credential.as_ref().is_some_and(Credential::is_usable)
    }
}
