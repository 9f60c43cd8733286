//! SyncOrchestrator - one sync flow per call
//!
//! Drives the pull/push flows between the local tab list and one remote
//! target. Per target, at most one sync runs at a time; a second call
//! while one is in flight is rejected without recording anything.
//!
//! Every completed attempt, success or failure, lands in the target's
//! bounded history. Failures that happen before any local write (missing
//! credential, auth rejection, truncated remote content) leave the local
//! tab list untouched.
//!
//! ## Flows
//!
//! - pull-merge (also the auto-sync flow): fetch remote, merge remote
//!   into local, persist, push the merged result back
//! - pull-force: fetch remote, replace local; nothing is pushed
//! - push-merge: fetch remote, merge local into it, persist, push
//! - push-force: push local; the remote is not read at all
//!
//! An empty remote turns the merge flows into a plain push (first sync
//! from this side); pull-force against an empty remote fails with
//! `RemoteEmpty`.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info, warn};

use tabvault_core::{
    domain::{
        Credential, FailureReason, RemoteTarget, SyncHistory, SyncResultItem, SyncStatus,
        SyncTargetConfig, SyncType, TabStore,
    },
    ports::{RemoteError, RemoteStore, StateRepository},
};
use tabvault_merge::{merge, MergeOptions};
use tabvault_store::TabManager;

use crate::factory::RemoteStoreFactory;

/// What a `sync_start` call ended up doing
#[derive(Debug)]
pub enum SyncStartOutcome {
    /// The flow ran to completion; the item is already recorded in the
    /// target's history.
    Completed(SyncResultItem),
    /// Another sync for the same target was in flight; nothing ran and
    /// nothing was recorded.
    AlreadyRunning,
}

/// Outcome of one flow before it is turned into a history item
enum SyncFailure {
    /// Recorded in history as a failed attempt
    Recorded(FailureReason),
    /// Storage is broken; propagated to the caller, not recorded
    Fatal(anyhow::Error),
}

/// Orchestrates sync flows across all configured remote targets
pub struct SyncOrchestrator {
    repo: Arc<dyn StateRepository>,
    manager: Arc<TabManager>,
    factory: Arc<dyn RemoteStoreFactory>,
    merge_options: MergeOptions,
    in_flight: DashMap<RemoteTarget, ()>,
}

impl SyncOrchestrator {
    pub fn new(
        repo: Arc<dyn StateRepository>,
        manager: Arc<TabManager>,
        factory: Arc<dyn RemoteStoreFactory>,
        merge_options: MergeOptions,
    ) -> Self {
        Self {
            repo,
            manager,
            factory,
            merge_options,
            in_flight: DashMap::new(),
        }
    }

    // ========================================================================
    // Entry point
    // ========================================================================

    /// Runs one sync flow against `target`.
    ///
    /// Returns [`SyncStartOutcome::AlreadyRunning`] without touching
    /// anything when a sync for the same target is already in flight.
    /// Only storage failures surface as `Err`; flow failures are recorded
    /// in the history and returned inside the completed item.
    pub async fn sync_start(
        &self,
        target: &RemoteTarget,
        sync_type: SyncType,
    ) -> anyhow::Result<SyncStartOutcome> {
        if self.in_flight.insert(target.clone(), ()).is_some() {
            warn!(%target, "sync already in flight, rejecting");
            return Ok(SyncStartOutcome::AlreadyRunning);
        }

        info!(%target, sync_type = ?sync_type, "sync started");
        let run = self.run_flow(target, sync_type).await;
        self.in_flight.remove(target);

        let item = match run {
            Ok(()) => SyncResultItem::success(sync_type),
            Err(SyncFailure::Recorded(reason)) => {
                warn!(%target, %reason, "sync failed");
                SyncResultItem::failure(sync_type, reason)
            }
            Err(SyncFailure::Fatal(e)) => return Err(e),
        };

        let mut history = self.repo.load_sync_history(target).await?;
        history.record(item.clone());
        self.repo.save_sync_history(target, &history).await?;

        Ok(SyncStartOutcome::Completed(item))
    }

    // ========================================================================
    // Status / history / configuration
    // ========================================================================

    /// Transient status of one target.
    pub fn sync_status(&self, target: &RemoteTarget) -> SyncStatus {
        if self.in_flight.contains_key(target) {
            SyncStatus::Syncing
        } else {
            SyncStatus::Idle
        }
    }

    /// The recorded attempts of one target, newest first.
    pub async fn sync_history(&self, target: &RemoteTarget) -> anyhow::Result<SyncHistory> {
        self.repo.load_sync_history(target).await
    }

    /// Stores a credential for `target` and clears that target's history.
    /// Other targets keep theirs: a token change invalidates only the
    /// attempts made against the old credential.
    pub async fn set_credential(
        &self,
        target: &RemoteTarget,
        credential: Credential,
    ) -> anyhow::Result<()> {
        let mut config = self.load_config(target).await?;
        config.credential = Some(credential);
        self.repo.save_sync_config(target, &config).await?;
        self.repo
            .save_sync_history(target, &SyncHistory::default())
            .await?;
        info!(%target, "credential updated, history cleared");
        Ok(())
    }

    /// Enables or disables the auto-sync timer for `target`.
    pub async fn set_auto_sync(&self, target: &RemoteTarget, enabled: bool) -> anyhow::Result<()> {
        let mut config = self.load_config(target).await?;
        config.auto_sync = enabled;
        self.repo.save_sync_config(target, &config).await?;
        Ok(())
    }

    /// Targets the auto-sync timer should drive: opted in and actually
    /// able to sync. Targets without a usable credential are skipped
    /// silently so the timer never pollutes their history.
    pub async fn auto_sync_targets(
        &self,
        candidates: &[RemoteTarget],
    ) -> anyhow::Result<Vec<RemoteTarget>> {
        let mut enabled = Vec::new();
        for target in candidates {
            let config = self.load_config(target).await?;
            if config.auto_sync && config.has_usable_credential() {
                enabled.push(target.clone());
            }
        }
        Ok(enabled)
    }

    async fn load_config(&self, target: &RemoteTarget) -> anyhow::Result<SyncTargetConfig> {
        Ok(self.repo.load_sync_config(target).await?.unwrap_or_default())
    }

    // ========================================================================
    // Flows
    // ========================================================================

    async fn run_flow(&self, target: &RemoteTarget, sync_type: SyncType) -> Result<(), SyncFailure> {
        let config = self.load_config(target).await.map_err(SyncFailure::Fatal)?;
        if !config.has_usable_credential() {
            return Err(SyncFailure::Recorded(FailureReason::MissingCredential));
        }
        let Some(remote) = self.factory.build(target, &config) else {
            return Err(SyncFailure::Recorded(FailureReason::MissingCredential));
        };
        let remote = remote.as_ref();

        match sync_type {
            SyncType::Auto | SyncType::ManualPullMerge => {
                self.pull_merge(target, &config, remote).await
            }
            SyncType::ManualPullForce => self.pull_force(remote).await,
            SyncType::ManualPushMerge => self.push_merge(target, &config, remote).await,
            SyncType::ManualPushForce => self.push_force(target, &config, remote).await,
        }
    }

    async fn pull_merge(
        &self,
        target: &RemoteTarget,
        config: &SyncTargetConfig,
        remote: &dyn RemoteStore,
    ) -> Result<(), SyncFailure> {
        let local = self.local_snapshot().await?;
        match self.fetch_remote(remote).await? {
            Some(remote_store) => {
                let merged = merge(&local, &remote_store, &self.merge_options);
                debug!(tabs = merged.tab_count(), "pull-merge merged snapshot");
                let merged = self
                    .manager
                    .replace_tab_list(merged)
                    .await
                    .map_err(SyncFailure::Fatal)?;
                self.push_payload(target, config, remote, &merged).await
            }
            // First sync from this side: nothing to merge, push local.
            None => self.push_payload(target, config, remote, &local).await,
        }
    }

    async fn pull_force(&self, remote: &dyn RemoteStore) -> Result<(), SyncFailure> {
        match self.fetch_remote(remote).await? {
            Some(remote_store) => {
                self.manager
                    .replace_tab_list(remote_store)
                    .await
                    .map_err(SyncFailure::Fatal)?;
                Ok(())
            }
            None => Err(SyncFailure::Recorded(FailureReason::RemoteEmpty)),
        }
    }

    async fn push_merge(
        &self,
        target: &RemoteTarget,
        config: &SyncTargetConfig,
        remote: &dyn RemoteStore,
    ) -> Result<(), SyncFailure> {
        let local = self.local_snapshot().await?;
        match self.fetch_remote(remote).await? {
            Some(remote_store) => {
                // Local merges *into* the remote shape: remote ordering
                // and flags win ties, locks still survive from both.
                let merged = merge(&remote_store, &local, &self.merge_options);
                let merged = self
                    .manager
                    .replace_tab_list(merged)
                    .await
                    .map_err(SyncFailure::Fatal)?;
                self.push_payload(target, config, remote, &merged).await
            }
            None => self.push_payload(target, config, remote, &local).await,
        }
    }

    async fn push_force(
        &self,
        target: &RemoteTarget,
        config: &SyncTargetConfig,
        remote: &dyn RemoteStore,
    ) -> Result<(), SyncFailure> {
        let local = self.local_snapshot().await?;
        self.push_payload(target, config, remote, &local).await
    }

    // ========================================================================
    // Shared steps
    // ========================================================================

    async fn local_snapshot(&self) -> Result<TabStore, SyncFailure> {
        self.manager.tab_list().await.map_err(SyncFailure::Fatal)
    }

    /// Fetches and parses the remote tab list. `None` means the remote
    /// holds nothing yet; integrity and transport errors are recorded.
    async fn fetch_remote(&self, remote: &dyn RemoteStore) -> Result<Option<TabStore>, SyncFailure> {
        match remote.read().await {
            Ok(raw) => TabStore::from_json(&raw)
                .map(Some)
                .map_err(|_| SyncFailure::Recorded(FailureReason::Serialization)),
            Err(RemoteError::NotFound) => Ok(None),
            Err(e) => Err(SyncFailure::Recorded(map_remote_error(e))),
        }
    }

    /// Serializes and pushes a snapshot; a pointer issued by the remote
    /// (freshly created gist) is recorded in the target's config.
    async fn push_payload(
        &self,
        target: &RemoteTarget,
        config: &SyncTargetConfig,
        remote: &dyn RemoteStore,
        store: &TabStore,
    ) -> Result<(), SyncFailure> {
        let body = store
            .to_json()
            .map_err(|_| SyncFailure::Recorded(FailureReason::Serialization))?;
        match remote.write(&body).await {
            Ok(Some(pointer)) => {
                info!(%target, pointer = %pointer, "remote created, recording pointer");
                let mut updated = config.clone();
                updated.remote_pointer = Some(pointer);
                self.repo
                    .save_sync_config(target, &updated)
                    .await
                    .map_err(SyncFailure::Fatal)?;
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => Err(SyncFailure::Recorded(map_remote_error(e))),
        }
    }
}

fn map_remote_error(e: RemoteError) -> FailureReason {
    match e {
        RemoteError::MissingCredential => FailureReason::MissingCredential,
        RemoteError::Auth => FailureReason::Auth,
        RemoteError::Truncated { .. } => FailureReason::Truncated,
        RemoteError::TooLarge { .. } => FailureReason::TooLarge,
        RemoteError::NotFound => FailureReason::RemoteEmpty,
        RemoteError::Network(_) | RemoteError::Api(_) => FailureReason::Network,
    }
}
