//! State repository port (driven/secondary port)
//!
//! Interface for persisting the tab list, the recycle bin, and per-target
//! sync metadata over a key-value persistence API.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because storage errors are adapter-specific
//!   (browser storage, file, memory) and don't need domain classification.
//! - Writes are whole-snapshot only: every mutating store operation saves
//!   the full serialized value under its logical key. Concurrent writers
//!   are last-write-wins at key granularity; the design tolerates this
//!   for a single-user local tool.
//! - Logical keys follow the persisted shape: `tabList`, `recycleBin`,
//!   `sync:config:<target>`, `sync:result:<target>`. Sync *status* is
//!   deliberately absent: it is transient and resets to idle on load.

use crate::domain::{RecycleBin, RemoteTarget, SyncHistory, SyncTargetConfig, TabStore};

/// Logical key of the serialized tab list
pub const KEY_TAB_LIST: &str = "tabList";

/// Logical key of the serialized recycle bin
pub const KEY_RECYCLE_BIN: &str = "recycleBin";

/// Logical key prefix of per-target sync config
pub const KEY_SYNC_CONFIG_PREFIX: &str = "sync:config:";

/// Logical key prefix of per-target sync history
pub const KEY_SYNC_RESULT_PREFIX: &str = "sync:result:";

/// Port trait for persistent state storage
#[async_trait::async_trait]
pub trait StateRepository: Send + Sync {
    /// Loads the tab list, or `None` when nothing was persisted yet.
    async fn load_tab_list(&self) -> anyhow::Result<Option<TabStore>>;

    /// Persists the full tab list snapshot.
    async fn save_tab_list(&self, store: &TabStore) -> anyhow::Result<()>;

    /// Loads the recycle bin, or `None` when nothing was persisted yet.
    async fn load_recycle_bin(&self) -> anyhow::Result<Option<RecycleBin>>;

    /// Persists the full recycle bin snapshot.
    async fn save_recycle_bin(&self, bin: &RecycleBin) -> anyhow::Result<()>;

    /// Loads the config of one remote target, or `None` when unconfigured.
    async fn load_sync_config(
        &self,
        target: &RemoteTarget,
    ) -> anyhow::Result<Option<SyncTargetConfig>>;

    /// Persists the config of one remote target.
    async fn save_sync_config(
        &self,
        target: &RemoteTarget,
        config: &SyncTargetConfig,
    ) -> anyhow::Result<()>;

    /// Loads the bounded history of one remote target (empty when absent).
    async fn load_sync_history(&self, target: &RemoteTarget) -> anyhow::Result<SyncHistory>;

    /// Persists the bounded history of one remote target.
    async fn save_sync_history(
        &self,
        target: &RemoteTarget,
        history: &SyncHistory,
    ) -> anyhow::Result<()>;
}
