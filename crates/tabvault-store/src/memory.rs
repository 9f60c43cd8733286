//! In-memory state repository adapter
//!
//! Backs the [`StateRepository`] port with a concurrent map of logical
//! key to serialized JSON value, mirroring the key-value shape of the
//! real persistence layer. Used by unit tests and as the default store
//! for ephemeral sessions.

use anyhow::Context;
use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};

use tabvault_core::{
    domain::{RecycleBin, RemoteTarget, SyncHistory, SyncTargetConfig, TabStore},
    ports::state_repository::{
        StateRepository, KEY_RECYCLE_BIN, KEY_SYNC_CONFIG_PREFIX, KEY_SYNC_RESULT_PREFIX,
        KEY_TAB_LIST,
    },
};

/// Key-value store of serialized snapshots, keyed by logical key
#[derive(Debug, Default)]
pub struct MemoryStateRepository {
    entries: DashMap<String, String>,
}

impl MemoryStateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn get<T: DeserializeOwned>(&self, key: &str) -> anyhow::Result<Option<T>> {
        match self.entries.get(key) {
            Some(raw) => {
                let value = serde_json::from_str(raw.value())
                    .with_context(|| format!("deserialize stored value under {key}"))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn put<T: Serialize>(&self, key: &str, value: &T) -> anyhow::Result<()> {
        let raw = serde_json::to_string(value)
            .with_context(|| format!("serialize value for {key}"))?;
        self.entries.insert(key.to_string(), raw);
        Ok(())
    }

    fn sync_config_key(target: &RemoteTarget) -> String {
        format!("{KEY_SYNC_CONFIG_PREFIX}{}", target.key())
    }

    fn sync_result_key(target: &RemoteTarget) -> String {
        format!("{KEY_SYNC_RESULT_PREFIX}{}", target.key())
    }
}

#[async_trait::async_trait]
impl StateRepository for MemoryStateRepository {
    async fn load_tab_list(&self) -> anyhow::Result<Option<TabStore>> {
        self.get(KEY_TAB_LIST)
    }

    async fn save_tab_list(&self, store: &TabStore) -> anyhow::Result<()> {
        self.put(KEY_TAB_LIST, store)
    }

    async fn load_recycle_bin(&self) -> anyhow::Result<Option<RecycleBin>> {
        self.get(KEY_RECYCLE_BIN)
    }

    async fn save_recycle_bin(&self, bin: &RecycleBin) -> anyhow::Result<()> {
        self.put(KEY_RECYCLE_BIN, bin)
    }

    async fn load_sync_config(
        &self,
        target: &RemoteTarget,
    ) -> anyhow::Result<Option<SyncTargetConfig>> {
        self.get(&Self::sync_config_key(target))
    }

    async fn save_sync_config(
        &self,
        target: &RemoteTarget,
        config: &SyncTargetConfig,
    ) -> anyhow::Result<()> {
        self.put(&Self::sync_config_key(target), config)
    }

    async fn load_sync_history(&self, target: &RemoteTarget) -> anyhow::Result<SyncHistory> {
        Ok(self
            .get(&Self::sync_result_key(target))?
            .unwrap_or_default())
    }

    async fn save_sync_history(
        &self,
        target: &RemoteTarget,
        history: &SyncHistory,
    ) -> anyhow::Result<()> {
        self.put(&Self::sync_result_key(target), history)
    }
}
