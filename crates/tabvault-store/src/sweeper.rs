//! Recycle bin sweeper - periodic purge of expired entries
//!
//! Runs as a detached tokio task. Each tick asks the [`TabManager`] to
//! purge entries older than the retention window; purge failures are
//! logged and the loop keeps running.

use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::manager::TabManager;

/// Background purge loop over the recycle bin
pub struct RecycleSweeper {
    manager: Arc<TabManager>,
    interval: Duration,
}

impl RecycleSweeper {
    pub fn new(manager: Arc<TabManager>, interval: Duration) -> Self {
        Self { manager, interval }
    }

    /// Spawns the sweep loop. The task runs until the handle is aborted
    /// or the runtime shuts down.
    pub fn spawn(self) -> JoinHandle<()> {
        info!(interval_secs = self.interval.as_secs(), "starting recycle sweeper");
        tokio::spawn(async move {
            let mut timer = tokio::time::interval(self.interval);
            timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                timer.tick().await;
                match self.manager.purge_expired().await {
                    Ok(0) => debug!("sweep found nothing to purge"),
                    Ok(purged) => info!(purged, "sweep purged expired entries"),
                    Err(e) => warn!(error = %e, "recycle sweep failed"),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStateRepository;
    use chrono::Utc;
    use tabvault_core::config::Config;

    #[tokio::test]
    async fn test_sweeper_purges_aged_entries() {
        let repo = Arc::new(MemoryStateRepository::new());
        let manager = Arc::new(TabManager::new(repo.clone(), &Config::default()));

        let store = manager.create_tag("Old").await.unwrap();
        let id = store.tags[1].id.clone();
        manager.remove_tag(&id).await.unwrap();

        let mut bin = manager.recycle_bin().await.unwrap();
        bin.entries[0].deleted_at = Utc::now() - chrono::Duration::hours(48);
        use tabvault_core::ports::StateRepository;
        repo.save_recycle_bin(&bin).await.unwrap();

        let handle = RecycleSweeper::new(manager.clone(), Duration::from_millis(10)).spawn();

        // First tick fires immediately; give it a moment to run.
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();

        assert!(manager.recycle_bin().await.unwrap().is_empty());
    }
}
