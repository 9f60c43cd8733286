//! TabManager - application service over the tab list and recycle bin
//!
//! Every mutating operation loads the current snapshot, applies the
//! domain operation, and persists the full snapshot back through the
//! [`StateRepository`] port. Removals park the detached entity in the
//! recycle bin instead of destroying it.
//!
//! Locked-entity rejections and unknown ids are results, not errors:
//! only storage failures propagate as `Err`.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info};

use tabvault_core::{
    config::Config,
    domain::{
        newtypes::{GroupId, TabId, TagId},
        recycle_bin::DeletedItem,
        tab_list::DEFAULT_GROUP_NAME,
        GroupUpdate, InsertPosition, RecycleBin, RemoveOutcome, Tab, TabGroup, TabStore, TabUpdate,
        Tag, TagUpdate,
    },
    ports::StateRepository,
};

/// Application service for the tab list hierarchy
pub struct TabManager {
    repo: Arc<dyn StateRepository>,
    insert_position: InsertPosition,
    allow_duplicate_tabs: bool,
    retention: Duration,
}

impl TabManager {
    pub fn new(repo: Arc<dyn StateRepository>, config: &Config) -> Self {
        Self {
            repo,
            insert_position: config.merge.insert_position,
            allow_duplicate_tabs: config.merge.allow_duplicate_tabs,
            retention: Duration::hours(config.recycle.retention_hours),
        }
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    /// Loads the tab list, bootstrapping and persisting the first-run
    /// shape when nothing was stored yet.
    pub async fn tab_list(&self) -> anyhow::Result<TabStore> {
        match self.repo.load_tab_list().await? {
            Some(store) => Ok(store),
            None => {
                let store = TabStore::bootstrap();
                info!("no stored tab list, bootstrapping first-run shape");
                self.repo.save_tab_list(&store).await?;
                Ok(store)
            }
        }
    }

    /// Loads the recycle bin, empty when nothing was stored yet.
    pub async fn recycle_bin(&self) -> anyhow::Result<RecycleBin> {
        Ok(self.repo.load_recycle_bin().await?.unwrap_or_default())
    }

    /// Replaces the whole tab list snapshot. Used by the sync flows after
    /// a merge; the input is normalized before it is persisted.
    pub async fn replace_tab_list(&self, mut store: TabStore) -> anyhow::Result<TabStore> {
        store.normalize();
        self.repo.save_tab_list(&store).await?;
        Ok(store)
    }

    // ========================================================================
    // Create
    // ========================================================================

    /// Creates an empty tag at the configured insert position.
    pub async fn create_tag(&self, name: &str) -> anyhow::Result<TabStore> {
        let mut store = self.tab_list().await?;
        store.add_tag(Tag::new(name), self.insert_position);
        debug!(name, "created tag");
        self.repo.save_tab_list(&store).await?;
        Ok(store)
    }

    /// Creates an empty group inside a tag. Unknown tag id is a silent
    /// no-op, matching the domain operation.
    pub async fn create_group(&self, tag_id: &TagId, name: &str) -> anyhow::Result<TabStore> {
        let mut store = self.tab_list().await?;
        if store.add_group(tag_id, TabGroup::new(name), self.insert_position) {
            debug!(name, tag = %tag_id, "created group");
            self.repo.save_tab_list(&store).await?;
        }
        Ok(store)
    }

    /// Parks a batch of captured tabs as a fresh group in the staging
    /// area. This is the "send tabs" entry point of the whole system.
    pub async fn send_tabs(&self, tabs: Vec<Tab>) -> anyhow::Result<TabStore> {
        let mut store = self.tab_list().await?;
        let mut group = TabGroup::new(DEFAULT_GROUP_NAME);
        group.tabs = tabs;
        let count = group.tabs.len();

        if let Some(staging) = store.static_tag_mut() {
            staging.groups.insert(0, group);
            staging.enforce_starred_prefix();
        } else {
            // Un-normalized snapshot; normalize creates the staging tag.
            store.normalize();
            if let Some(staging) = store.static_tag_mut() {
                staging.groups.insert(0, group);
                staging.enforce_starred_prefix();
            }
        }

        info!(tabs = count, "sent tabs to staging");
        self.repo.save_tab_list(&store).await?;
        Ok(store)
    }

    /// Appends tabs to an existing group. Move-in is allowed even when
    /// the group is locked.
    pub async fn add_tabs(&self, group_id: &GroupId, tabs: Vec<Tab>) -> anyhow::Result<bool> {
        let mut store = self.tab_list().await?;
        let added = store.add_tabs(group_id, tabs, self.insert_position);
        if added {
            self.repo.save_tab_list(&store).await?;
        }
        Ok(added)
    }

    /// Drops same-url duplicates within one group, first occurrence wins.
    /// A no-op returning 0 when duplicates are allowed by config or the
    /// group id does not resolve.
    pub async fn dedup_tabs_in_group(&self, group_id: &GroupId) -> anyhow::Result<usize> {
        if self.allow_duplicate_tabs {
            return Ok(0);
        }
        let mut store = self.tab_list().await?;
        let Some((ti, gi)) = store.locate_group(group_id) else {
            return Ok(0);
        };
        let dropped = store.tags[ti].groups[gi].dedup_tabs();
        if dropped > 0 {
            debug!(group = %group_id, dropped, "deduplicated tabs");
            self.repo.save_tab_list(&store).await?;
        }
        Ok(dropped)
    }

    // ========================================================================
    // Update
    // ========================================================================

    /// Merges fields into a tag. Returns `false` for an unknown id.
    pub async fn update_tag(&self, id: &TagId, update: TagUpdate) -> anyhow::Result<bool> {
        let mut store = self.tab_list().await?;
        let changed = store.update_tag(id, update);
        if changed {
            self.repo.save_tab_list(&store).await?;
        }
        Ok(changed)
    }

    /// Merges fields into a group. Returns `false` for an unknown id.
    pub async fn update_group(&self, id: &GroupId, update: GroupUpdate) -> anyhow::Result<bool> {
        let mut store = self.tab_list().await?;
        let changed = store.update_group(id, update);
        if changed {
            self.repo.save_tab_list(&store).await?;
        }
        Ok(changed)
    }

    /// Merges fields into a tab. Returns `false` for an unknown id.
    pub async fn update_tab(&self, id: &TabId, update: TabUpdate) -> anyhow::Result<bool> {
        let mut store = self.tab_list().await?;
        let changed = store.update_tab(id, update);
        if changed {
            self.repo.save_tab_list(&store).await?;
        }
        Ok(changed)
    }

    // ========================================================================
    // Remove (soft delete into the recycle bin)
    // ========================================================================

    /// Soft-deletes a tag. The static tag and locked tags reject.
    pub async fn remove_tag(&self, id: &TagId) -> anyhow::Result<RemoveOutcome<()>> {
        let mut store = self.tab_list().await?;
        match store.remove_tag(id) {
            RemoveOutcome::Removed(tag) => {
                let mut bin = self.recycle_bin().await?;
                info!(name = %tag.name, "tag moved to recycle bin");
                bin.push(DeletedItem::Tag { tag });
                self.repo.save_tab_list(&store).await?;
                self.repo.save_recycle_bin(&bin).await?;
                Ok(RemoveOutcome::Removed(()))
            }
            RemoveOutcome::RejectedLocked => Ok(RemoveOutcome::RejectedLocked),
            RemoveOutcome::NotFound => Ok(RemoveOutcome::NotFound),
        }
    }

    /// Soft-deletes a group, remembering its parent tag name for restore.
    pub async fn remove_group(&self, id: &GroupId) -> anyhow::Result<RemoveOutcome<()>> {
        let mut store = self.tab_list().await?;
        let parent_tag = store
            .locate_group(id)
            .map(|(ti, _)| store.tags[ti].name.clone());
        match store.remove_group(id) {
            RemoveOutcome::Removed(group) => {
                let mut bin = self.recycle_bin().await?;
                info!(name = %group.name, "group moved to recycle bin");
                bin.push(DeletedItem::Group {
                    parent_tag: parent_tag.unwrap_or_default(),
                    group,
                });
                self.repo.save_tab_list(&store).await?;
                self.repo.save_recycle_bin(&bin).await?;
                Ok(RemoveOutcome::Removed(()))
            }
            RemoveOutcome::RejectedLocked => Ok(RemoveOutcome::RejectedLocked),
            RemoveOutcome::NotFound => Ok(RemoveOutcome::NotFound),
        }
    }

    /// Soft-deletes a tab, remembering its parent tag and group names.
    pub async fn remove_tab(&self, id: &TabId) -> anyhow::Result<RemoveOutcome<()>> {
        let mut store = self.tab_list().await?;
        let parents = store.locate_tab(id).map(|(ti, gi, _)| {
            (
                store.tags[ti].name.clone(),
                store.tags[ti].groups[gi].name.clone(),
            )
        });
        match store.remove_tab(id) {
            RemoveOutcome::Removed(tab) => {
                let (parent_tag, parent_group) = parents.unwrap_or_default();
                let mut bin = self.recycle_bin().await?;
                bin.push(DeletedItem::Tab {
                    parent_tag,
                    parent_group,
                    tab,
                });
                self.repo.save_tab_list(&store).await?;
                self.repo.save_recycle_bin(&bin).await?;
                Ok(RemoveOutcome::Removed(()))
            }
            RemoveOutcome::RejectedLocked => Ok(RemoveOutcome::RejectedLocked),
            RemoveOutcome::NotFound => Ok(RemoveOutcome::NotFound),
        }
    }

    // ========================================================================
    // Reorder
    // ========================================================================

    /// Stable move of a tag; index errors propagate.
    pub async fn reorder_tags(&self, from: usize, to: usize) -> anyhow::Result<()> {
        let mut store = self.tab_list().await?;
        store.reorder_tags(from, to)?;
        self.repo.save_tab_list(&store).await?;
        Ok(())
    }

    /// Stable move of a group within a tag, with the auto-star rules at
    /// the starred boundary.
    pub async fn reorder_groups(
        &self,
        tag_id: &TagId,
        from: usize,
        to: usize,
    ) -> anyhow::Result<()> {
        let mut store = self.tab_list().await?;
        store.reorder_groups(tag_id, from, to)?;
        self.repo.save_tab_list(&store).await?;
        Ok(())
    }

    /// Stable move of a tab within its group.
    pub async fn reorder_tabs(
        &self,
        group_id: &GroupId,
        from: usize,
        to: usize,
    ) -> anyhow::Result<()> {
        let mut store = self.tab_list().await?;
        store.reorder_tabs(group_id, from, to)?;
        self.repo.save_tab_list(&store).await?;
        Ok(())
    }

    // ========================================================================
    // Recycle bin
    // ========================================================================

    /// Restores the recycle entry at `index` back into the tab list.
    /// Returns `false` when the index does not resolve.
    pub async fn restore_entry(&self, index: usize) -> anyhow::Result<bool> {
        let mut store = self.tab_list().await?;
        let mut bin = self.recycle_bin().await?;
        let restored = bin.restore(index, &mut store);
        if restored {
            info!(index, "restored recycle bin entry");
            self.repo.save_tab_list(&store).await?;
            self.repo.save_recycle_bin(&bin).await?;
        }
        Ok(restored)
    }

    /// Purges recycle entries older than the retention window. Returns
    /// the number of purged entries.
    pub async fn purge_expired(&self) -> anyhow::Result<usize> {
        let mut bin = self.recycle_bin().await?;
        let purged = bin.purge_expired(self.retention);
        if purged > 0 {
            info!(purged, "purged expired recycle bin entries");
            self.repo.save_recycle_bin(&bin).await?;
        }
        Ok(purged)
    }
}
