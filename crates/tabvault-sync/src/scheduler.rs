//! Auto-sync scheduler
//!
//! One re-armable timer for the whole system. Each tick runs the auto
//! flow against every target whose config opts into auto-sync; a target
//! already syncing is skipped by the orchestrator's in-flight guard, so
//! overlapping ticks are harmless.
//!
//! Re-arming aborts the previous timer task and spawns a fresh one, so
//! an interval change takes effect immediately.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use tabvault_core::domain::{RemoteTarget, SyncType};

use crate::orchestrator::SyncOrchestrator;

/// Single re-armable timer driving periodic auto syncs
pub struct AutoSyncScheduler {
    orchestrator: Arc<SyncOrchestrator>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl AutoSyncScheduler {
    pub fn new(orchestrator: Arc<SyncOrchestrator>) -> Self {
        Self {
            orchestrator,
            handle: Mutex::new(None),
        }
    }

    /// Arms the timer, replacing any previous one. `candidates` is the
    /// set of targets to consider; each tick re-reads their configs so
    /// toggling auto-sync needs no re-arm.
    pub fn arm(&self, interval: Duration, candidates: Vec<RemoteTarget>) {
        let orchestrator = self.orchestrator.clone();
        info!(interval_secs = interval.as_secs(), "arming auto-sync timer");

        let task = tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick of a tokio interval fires immediately;
            // consume it so the first sync happens one interval from now.
            timer.tick().await;
            loop {
                timer.tick().await;
                let targets = match orchestrator.auto_sync_targets(&candidates).await {
                    Ok(targets) => targets,
                    Err(e) => {
                        warn!(error = %e, "auto-sync tick could not read configs");
                        continue;
                    }
                };
                for target in targets {
                    debug!(%target, "auto-sync tick");
                    if let Err(e) = orchestrator.sync_start(&target, SyncType::Auto).await {
                        warn!(%target, error = %e, "auto sync failed fatally");
                    }
                }
            }
        });

        let mut slot = self.handle.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(old) = slot.replace(task) {
            old.abort();
        }
    }

    /// Stops the timer. A no-op when nothing is armed.
    pub fn disarm(&self) {
        let mut slot = self.handle.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(task) = slot.take() {
            info!("disarming auto-sync timer");
            task.abort();
        }
    }

    /// True while a timer task is armed.
    pub fn is_armed(&self) -> bool {
        let slot = self.handle.lock().unwrap_or_else(|p| p.into_inner());
        slot.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for AutoSyncScheduler {
    fn drop(&mut self) {
        self.disarm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    use tabvault_core::{
        config::Config,
        domain::{Credential, SyncTargetConfig},
        ports::{RemoteError, RemoteStore},
    };
    use tabvault_merge::MergeOptions;
    use tabvault_store::{MemoryStateRepository, TabManager};

    use crate::factory::RemoteStoreFactory;

    struct CountingRemote {
        writes: Arc<StdMutex<u32>>,
    }

    #[async_trait::async_trait]
    impl RemoteStore for CountingRemote {
        async fn read(&self) -> Result<String, RemoteError> {
            Err(RemoteError::NotFound)
        }

        async fn write(&self, _body: &str) -> Result<Option<String>, RemoteError> {
            *self.writes.lock().unwrap() += 1;
            Ok(None)
        }
    }

    struct CountingFactory {
        writes: Arc<StdMutex<u32>>,
    }

    impl RemoteStoreFactory for CountingFactory {
        fn build(
            &self,
            _target: &RemoteTarget,
            config: &SyncTargetConfig,
        ) -> Option<Box<dyn RemoteStore>> {
            config.has_usable_credential().then(|| {
                Box::new(CountingRemote {
                    writes: self.writes.clone(),
                }) as Box<dyn RemoteStore>
            })
        }
    }

    async fn orchestrator_with_counter() -> (Arc<SyncOrchestrator>, Arc<StdMutex<u32>>) {
        let repo = Arc::new(MemoryStateRepository::new());
        let manager = Arc::new(TabManager::new(repo.clone(), &Config::default()));
        let writes = Arc::new(StdMutex::new(0));
        let factory = Arc::new(CountingFactory {
            writes: writes.clone(),
        });
        let orchestrator = Arc::new(SyncOrchestrator::new(
            repo,
            manager,
            factory,
            MergeOptions::default(),
        ));
        orchestrator
            .set_credential(
                &RemoteTarget::GithubGist,
                Credential::AccessToken("tok".to_string()),
            )
            .await
            .unwrap();
        orchestrator
            .set_auto_sync(&RemoteTarget::GithubGist, true)
            .await
            .unwrap();
        (orchestrator, writes)
    }

    #[tokio::test]
    async fn test_armed_timer_runs_auto_sync() {
        let (orchestrator, writes) = orchestrator_with_counter().await;
        let scheduler = AutoSyncScheduler::new(orchestrator);

        scheduler.arm(
            Duration::from_millis(20),
            vec![RemoteTarget::GithubGist, RemoteTarget::GiteeGist],
        );
        assert!(scheduler.is_armed());

        tokio::time::sleep(Duration::from_millis(120)).await;
        scheduler.disarm();
        assert!(!scheduler.is_armed());

        assert!(*writes.lock().unwrap() >= 1, "auto flow pushed at least once");
    }

    #[tokio::test]
    async fn test_timer_leaves_credentialless_target_untouched() {
        let (orchestrator, writes) = orchestrator_with_counter().await;
        let gitee = RemoteTarget::GiteeGist; // auto-sync on, no credential
        orchestrator.set_auto_sync(&gitee, true).await.unwrap();
        let scheduler = AutoSyncScheduler::new(orchestrator.clone());

        scheduler.arm(Duration::from_millis(20), vec![gitee.clone()]);
        tokio::time::sleep(Duration::from_millis(120)).await;
        scheduler.disarm();

        // No attempt was made, so nothing landed in its history.
        let history = orchestrator.sync_history(&gitee).await.unwrap();
        assert!(history.items.is_empty());
        assert_eq!(*writes.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_rearm_replaces_previous_timer() {
        let (orchestrator, _writes) = orchestrator_with_counter().await;
        let scheduler = AutoSyncScheduler::new(orchestrator);

        scheduler.arm(Duration::from_secs(3600), vec![RemoteTarget::GithubGist]);
        scheduler.arm(Duration::from_secs(1800), vec![RemoteTarget::GithubGist]);
        assert!(scheduler.is_armed());

        scheduler.disarm();
        assert!(!scheduler.is_armed());
    }

    #[tokio::test]
    async fn test_disarm_without_arm_is_noop() {
        let (orchestrator, _writes) = orchestrator_with_counter().await;
        let scheduler = AutoSyncScheduler::new(orchestrator);
        scheduler.disarm();
        assert!(!scheduler.is_armed());
    }
}
