//! Soft-delete recycle bin
//!
//! Removed tags/groups/tabs are parked here with a deletion timestamp
//! instead of being destroyed, so users can recover them. A periodic sweep
//! purges entries older than the retention window.
//!
//! Entries remember where they came from (parent tag/group *names*, not
//! ids) so restore can re-attach them; when the original parent is gone,
//! restore falls back to the staging area.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::tab_list::{InsertPosition, Tab, TabGroup, TabStore, Tag};

/// Default retention window before a deleted entry is purged (24 hours)
pub const DEFAULT_RETENTION_HOURS: i64 = 24;

/// A soft-deleted entity plus enough context to restore it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DeletedItem {
    /// A whole tag with its groups and tabs
    Tag { tag: Tag },
    /// A group, remembering the tag it belonged to
    Group { parent_tag: String, group: TabGroup },
    /// A single tab, remembering its tag and group
    Tab {
        parent_tag: String,
        parent_group: String,
        tab: Tab,
    },
}

/// One recycle bin entry: the deleted item and when it was deleted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecycleEntry {
    pub deleted_at: DateTime<Utc>,
    #[serde(flatten)]
    pub item: DeletedItem,
}

/// The recycle bin: newest-first list of soft-deleted entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecycleBin {
    pub entries: Vec<RecycleEntry>,
}

impl RecycleBin {
    /// Parks a deleted item with the current timestamp.
    pub fn push(&mut self, item: DeletedItem) {
        self.entries.insert(
            0,
            RecycleEntry {
                deleted_at: Utc::now(),
                item,
            },
        );
    }

    /// Drops entries deleted more than `retention` ago. Returns the number
    /// of purged entries.
    pub fn purge_expired(&mut self, retention: Duration) -> usize {
        let cutoff = Utc::now() - retention;
        let before = self.entries.len();
        self.entries.retain(|e| e.deleted_at > cutoff);
        before - self.entries.len()
    }

    /// Removes the entry at `index` and re-attaches it to `store`.
    ///
    /// Restore targets are matched by name; a missing parent falls back to
    /// the staging area (a group shell is created for orphaned tabs).
    /// Returns `false` when the index does not resolve.
    pub fn restore(&mut self, index: usize, store: &mut TabStore) -> bool {
        if index >= self.entries.len() {
            return false;
        }
        let entry = self.entries.remove(index);
        match entry.item {
            DeletedItem::Tag { tag } => {
                store.add_tag(tag, InsertPosition::Top);
            }
            DeletedItem::Group { parent_tag, group } => {
                let target = store
                    .tags
                    .iter()
                    .position(|t| t.name == parent_tag)
                    .or_else(|| store.tags.iter().position(|t| t.is_static));
                if let Some(ti) = target {
                    store.tags[ti].groups.insert(0, group);
                    store.tags[ti].enforce_starred_prefix();
                }
            }
            DeletedItem::Tab {
                parent_tag,
                parent_group,
                tab,
            } => {
                let ti = store
                    .tags
                    .iter()
                    .position(|t| t.name == parent_tag)
                    .or_else(|| store.tags.iter().position(|t| t.is_static));
                let Some(ti) = ti else {
                    return true;
                };
                let tag = &mut store.tags[ti];
                match tag.groups.iter_mut().find(|g| g.name == parent_group) {
                    Some(group) => group.tabs.insert(0, tab),
                    None => {
                        let mut shell = TabGroup::new(parent_group);
                        shell.tabs.push(tab);
                        tag.groups.push(shell);
                        tag.enforce_starred_prefix();
                    }
                }
            }
        }
        store.normalize();
        true
    }

    /// True when the bin holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
