//! Tab list hierarchy: `TabStore` -> `Tag` -> `TabGroup` -> `Tab`
//!
//! The store is an ordered sequence of tags. Exactly one tag is *static*
//! (the staging area) and always sits at index 0; it is the default
//! destination for newly captured tabs. Within a tag, starred groups form
//! a contiguous prefix of the group sequence.
//!
//! All operations here are pure in-memory mutations; persistence is the
//! responsibility of the store service that wraps this type. Mutations that
//! can disturb an invariant call [`TabStore::normalize`] before returning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::newtypes::{GroupId, TabId, TagId};

/// Name of the staging-area tag created on first run
pub const STAGING_TAG_NAME: &str = "Staging";

/// Name of the group created inside the staging area on first run
pub const DEFAULT_GROUP_NAME: &str = "Unnamed group";

fn now() -> DateTime<Utc> {
    Utc::now()
}

// ============================================================================
// InsertPosition
// ============================================================================

/// Where newly added entities land within their parent's sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertPosition {
    /// Insert at the front (after any pinned prefix)
    #[default]
    Top,
    /// Append at the end
    Bottom,
}

// ============================================================================
// Tab
// ============================================================================

/// A captured browser tab. Leaf node of the hierarchy.
///
/// `id` is a locally generated random token and carries no cross-device
/// meaning; two tabs with the same `url` are duplicates for dedup purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    #[serde(default = "TabId::generate")]
    pub id: TabId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub fav_icon_url: String,
}

impl Tab {
    /// Creates a tab with a fresh id.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: TabId::generate(),
            title: title.into(),
            url: url.into(),
            fav_icon_url: String::new(),
        }
    }
}

// ============================================================================
// TabGroup
// ============================================================================

/// A named, ordered collection of tabs within a tag.
///
/// A locked group rejects removal and move-out of itself and its tabs;
/// move-in is still allowed. Starred groups are pinned to the front of
/// the parent tag's group list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabGroup {
    #[serde(default = "GroupId::generate")]
    pub id: GroupId,
    #[serde(default)]
    pub name: String,
    #[serde(default = "now")]
    pub create_time: DateTime<Utc>,
    #[serde(default)]
    pub tabs: Vec<Tab>,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub is_starred: bool,
}

impl TabGroup {
    /// Creates an empty group with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: GroupId::generate(),
            name: name.into(),
            create_time: Utc::now(),
            tabs: Vec::new(),
            is_locked: false,
            is_starred: false,
        }
    }

    /// Removes tabs whose `url` already appeared earlier in the list,
    /// keeping the first occurrence. Returns the number of tabs dropped.
    pub fn dedup_tabs(&mut self) -> usize {
        let before = self.tabs.len();
        let mut seen = std::collections::HashSet::new();
        self.tabs.retain(|tab| seen.insert(tab.url.clone()));
        before - self.tabs.len()
    }
}

// ============================================================================
// Tag
// ============================================================================

/// Top-level category in the tab list.
///
/// Exactly one tag per store has `is_static = true`: the staging area,
/// always first in tag order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    #[serde(default = "TagId::generate")]
    pub id: TagId,
    #[serde(default)]
    pub name: String,
    #[serde(default = "now")]
    pub create_time: DateTime<Utc>,
    #[serde(default)]
    pub groups: Vec<TabGroup>,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub is_starred: bool,
}

impl Tag {
    /// Creates an empty ordinary tag.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TagId::generate(),
            name: name.into(),
            create_time: Utc::now(),
            groups: Vec::new(),
            is_static: false,
            is_locked: false,
            is_starred: false,
        }
    }

    /// Creates the staging-area tag.
    pub fn staging() -> Self {
        let mut tag = Self::new(STAGING_TAG_NAME);
        tag.is_static = true;
        tag
    }

    /// Re-establishes the starred-prefix invariant: starred groups before
    /// unstarred ones, each side keeping its relative order.
    pub fn enforce_starred_prefix(&mut self) {
        let (starred, rest): (Vec<_>, Vec<_>) =
            self.groups.drain(..).partition(|g| g.is_starred);
        self.groups = starred;
        self.groups.extend(rest);
    }

    /// True when no unstarred group precedes a starred one.
    pub fn starred_prefix_holds(&self) -> bool {
        let mut seen_unstarred = false;
        for group in &self.groups {
            if group.is_starred && seen_unstarred {
                return false;
            }
            seen_unstarred |= !group.is_starred;
        }
        true
    }
}

// ============================================================================
// Partial updates
// ============================================================================

/// Partial-field update for a tag; `None` fields are untouched.
#[derive(Debug, Clone, Default)]
pub struct TagUpdate {
    pub name: Option<String>,
    pub is_locked: Option<bool>,
    pub is_starred: Option<bool>,
}

/// Partial-field update for a group; `None` fields are untouched.
#[derive(Debug, Clone, Default)]
pub struct GroupUpdate {
    pub name: Option<String>,
    pub is_locked: Option<bool>,
    pub is_starred: Option<bool>,
}

/// Partial-field update for a tab; `None` fields are untouched.
#[derive(Debug, Clone, Default)]
pub struct TabUpdate {
    pub title: Option<String>,
    pub url: Option<String>,
    pub fav_icon_url: Option<String>,
}

// ============================================================================
// RemoveOutcome
// ============================================================================

/// Synchronous result code of a removal attempt.
///
/// Locked-entity rejection is a result, not an error: the caller inspects
/// the outcome and the store is guaranteed untouched unless `Removed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome<T> {
    /// The entity was detached from the store and is carried here so the
    /// caller can place it in the recycle bin.
    Removed(T),
    /// The entity or an ancestor is locked; nothing changed.
    RejectedLocked,
    /// No entity with that id exists; nothing changed.
    NotFound,
}

impl<T> RemoveOutcome<T> {
    /// True when the entity was actually removed.
    pub fn is_removed(&self) -> bool {
        matches!(self, RemoveOutcome::Removed(_))
    }
}

// ============================================================================
// TabStore
// ============================================================================

/// The full hierarchical tab list: an ordered sequence of tags.
///
/// Serializes as a bare array of tags, which is the wire and persistence
/// shape shared with remote copies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabStore {
    pub tags: Vec<Tag>,
}

impl TabStore {
    /// Creates the first-run store: one staging tag containing one empty
    /// default group.
    pub fn bootstrap() -> Self {
        let mut staging = Tag::staging();
        staging.groups.push(TabGroup::new(DEFAULT_GROUP_NAME));
        Self {
            tags: vec![staging],
        }
    }

    /// Parses the serialized wire shape (array of tags) and normalizes it.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let mut store: TabStore = serde_json::from_str(raw)?;
        store.normalize();
        Ok(store)
    }

    /// Serializes to the wire shape.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    // ------------------------------------------------------------------
    // Invariant enforcement
    // ------------------------------------------------------------------

    /// Re-establishes the store invariants:
    ///
    /// - exactly one static tag, at index 0 (the first static tag in order
    ///   wins; extras are demoted; a missing one is created);
    /// - starred groups form a contiguous prefix within every tag.
    pub fn normalize(&mut self) {
        let mut seen_static = false;
        for tag in &mut self.tags {
            if tag.is_static {
                if seen_static {
                    tag.is_static = false;
                } else {
                    seen_static = true;
                }
            }
        }

        if !seen_static {
            self.tags.insert(0, Tag::staging());
        } else if let Some(pos) = self.tags.iter().position(|t| t.is_static) {
            if pos != 0 {
                let staging = self.tags.remove(pos);
                self.tags.insert(0, staging);
            }
        }

        for tag in &mut self.tags {
            tag.enforce_starred_prefix();
        }
    }

    /// Index of the static tag, if the store is non-empty and normalized.
    pub fn static_tag(&self) -> Option<&Tag> {
        self.tags.iter().find(|t| t.is_static)
    }

    /// Mutable access to the static tag.
    pub fn static_tag_mut(&mut self) -> Option<&mut Tag> {
        self.tags.iter_mut().find(|t| t.is_static)
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Index of a tag by id.
    pub fn locate_tag(&self, id: &TagId) -> Option<usize> {
        self.tags.iter().position(|t| &t.id == id)
    }

    /// `(tag index, group index)` of a group by id.
    pub fn locate_group(&self, id: &GroupId) -> Option<(usize, usize)> {
        for (ti, tag) in self.tags.iter().enumerate() {
            if let Some(gi) = tag.groups.iter().position(|g| &g.id == id) {
                return Some((ti, gi));
            }
        }
        None
    }

    /// `(tag index, group index, tab index)` of a tab by id.
    pub fn locate_tab(&self, id: &TabId) -> Option<(usize, usize, usize)> {
        for (ti, tag) in self.tags.iter().enumerate() {
            for (gi, group) in tag.groups.iter().enumerate() {
                if let Some(tbi) = group.tabs.iter().position(|t| &t.id == id) {
                    return Some((ti, gi, tbi));
                }
            }
        }
        None
    }

    /// Total number of tabs across the whole store.
    pub fn tab_count(&self) -> usize {
        self.tags
            .iter()
            .flat_map(|t| &t.groups)
            .map(|g| g.tabs.len())
            .sum()
    }

    // ------------------------------------------------------------------
    // Add
    // ------------------------------------------------------------------

    /// Inserts a tag at the configured position. The static tag stays
    /// pinned at index 0; `Top` therefore means index 1.
    pub fn add_tag(&mut self, tag: Tag, position: InsertPosition) {
        match position {
            InsertPosition::Top => {
                let at = usize::from(self.tags.first().is_some_and(|t| t.is_static));
                self.tags.insert(at, tag);
            }
            InsertPosition::Bottom => self.tags.push(tag),
        }
        self.normalize();
    }

    /// Inserts a group into a tag. Returns `false` (silent no-op) when the
    /// tag id does not resolve.
    pub fn add_group(&mut self, tag_id: &TagId, group: TabGroup, position: InsertPosition) -> bool {
        let Some(ti) = self.locate_tag(tag_id) else {
            return false;
        };
        let tag = &mut self.tags[ti];
        match position {
            InsertPosition::Top => tag.groups.insert(0, group),
            InsertPosition::Bottom => tag.groups.push(group),
        }
        tag.enforce_starred_prefix();
        true
    }

    /// Appends tabs into a group. Move-in is allowed even when the group is
    /// locked. Returns `false` when the group id does not resolve.
    pub fn add_tabs(&mut self, group_id: &GroupId, tabs: Vec<Tab>, position: InsertPosition) -> bool {
        let Some((ti, gi)) = self.locate_group(group_id) else {
            return false;
        };
        let group = &mut self.tags[ti].groups[gi];
        match position {
            InsertPosition::Top => {
                for (offset, tab) in tabs.into_iter().enumerate() {
                    group.tabs.insert(offset, tab);
                }
            }
            InsertPosition::Bottom => group.tabs.extend(tabs),
        }
        true
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Merges fields into a tag. Unknown id is a no-op (`false`).
    pub fn update_tag(&mut self, id: &TagId, update: TagUpdate) -> bool {
        let Some(ti) = self.locate_tag(id) else {
            return false;
        };
        let tag = &mut self.tags[ti];
        if let Some(name) = update.name {
            tag.name = name;
        }
        if let Some(locked) = update.is_locked {
            tag.is_locked = locked;
        }
        if let Some(starred) = update.is_starred {
            tag.is_starred = starred;
        }
        true
    }

    /// Merges fields into a group. Unknown id is a no-op (`false`).
    /// Star changes re-enforce the starred-prefix invariant.
    pub fn update_group(&mut self, id: &GroupId, update: GroupUpdate) -> bool {
        let Some((ti, gi)) = self.locate_group(id) else {
            return false;
        };
        let tag = &mut self.tags[ti];
        let group = &mut tag.groups[gi];
        if let Some(name) = update.name {
            group.name = name;
        }
        if let Some(locked) = update.is_locked {
            group.is_locked = locked;
        }
        if let Some(starred) = update.is_starred {
            group.is_starred = starred;
            tag.enforce_starred_prefix();
        }
        true
    }

    /// Merges fields into a tab. Unknown id is a no-op (`false`).
    pub fn update_tab(&mut self, id: &TabId, update: TabUpdate) -> bool {
        let Some((ti, gi, tbi)) = self.locate_tab(id) else {
            return false;
        };
        let tab = &mut self.tags[ti].groups[gi].tabs[tbi];
        if let Some(title) = update.title {
            tab.title = title;
        }
        if let Some(url) = update.url {
            tab.url = url;
        }
        if let Some(fav) = update.fav_icon_url {
            tab.fav_icon_url = fav;
        }
        true
    }

    // ------------------------------------------------------------------
    // Remove
    // ------------------------------------------------------------------

    /// Detaches a tag. The static tag and locked tags are rejected.
    pub fn remove_tag(&mut self, id: &TagId) -> RemoveOutcome<Tag> {
        let Some(ti) = self.locate_tag(id) else {
            return RemoveOutcome::NotFound;
        };
        let tag = &self.tags[ti];
        if tag.is_static || tag.is_locked {
            return RemoveOutcome::RejectedLocked;
        }
        RemoveOutcome::Removed(self.tags.remove(ti))
    }

    /// Detaches a group. A locked group or a locked parent tag rejects.
    pub fn remove_group(&mut self, id: &GroupId) -> RemoveOutcome<TabGroup> {
        let Some((ti, gi)) = self.locate_group(id) else {
            return RemoveOutcome::NotFound;
        };
        let tag = &self.tags[ti];
        if tag.is_locked || tag.groups[gi].is_locked {
            return RemoveOutcome::RejectedLocked;
        }
        RemoveOutcome::Removed(self.tags[ti].groups.remove(gi))
    }

    /// Detaches a tab. A locked group or tag anywhere above rejects.
    pub fn remove_tab(&mut self, id: &TabId) -> RemoveOutcome<Tab> {
        let Some((ti, gi, tbi)) = self.locate_tab(id) else {
            return RemoveOutcome::NotFound;
        };
        let tag = &self.tags[ti];
        if tag.is_locked || tag.groups[gi].is_locked {
            return RemoveOutcome::RejectedLocked;
        }
        RemoveOutcome::Removed(self.tags[ti].groups[gi].tabs.remove(tbi))
    }

    // ------------------------------------------------------------------
    // Reorder
    // ------------------------------------------------------------------

    /// Stable move of a tag from one index to another. The static tag is
    /// re-pinned to index 0 afterwards.
    pub fn reorder_tags(&mut self, from: usize, to: usize) -> Result<(), DomainError> {
        let len = self.tags.len();
        if from >= len || to >= len {
            return Err(DomainError::IndexOutOfBounds {
                index: from.max(to),
                len,
            });
        }
        let tag = self.tags.remove(from);
        self.tags.insert(to, tag);
        self.normalize();
        Ok(())
    }

    /// Stable move of a group within its tag.
    ///
    /// The starred boundary is re-enforced on the moved group itself:
    /// landing before a starred group auto-stars it, landing after an
    /// unstarred group auto-unstars it.
    pub fn reorder_groups(
        &mut self,
        tag_id: &TagId,
        from: usize,
        to: usize,
    ) -> Result<(), DomainError> {
        let Some(ti) = self.locate_tag(tag_id) else {
            return Err(DomainError::UnknownId(tag_id.to_string()));
        };
        let groups = &mut self.tags[ti].groups;
        let len = groups.len();
        if from >= len || to >= len {
            return Err(DomainError::IndexOutOfBounds {
                index: from.max(to),
                len,
            });
        }
        let group = groups.remove(from);
        groups.insert(to, group);

        let starred_after = groups[to + 1..].iter().any(|g| g.is_starred);
        let unstarred_before = groups[..to].iter().any(|g| !g.is_starred);
        let moved = &mut groups[to];
        if starred_after {
            moved.is_starred = true;
        } else if unstarred_before {
            moved.is_starred = false;
        }
        Ok(())
    }

    /// Stable move of a tab within its group.
    pub fn reorder_tabs(
        &mut self,
        group_id: &GroupId,
        from: usize,
        to: usize,
    ) -> Result<(), DomainError> {
        let Some((ti, gi)) = self.locate_group(group_id) else {
            return Err(DomainError::UnknownId(group_id.to_string()));
        };
        let tabs = &mut self.tags[ti].groups[gi].tabs;
        let len = tabs.len();
        if from >= len || to >= len {
            return Err(DomainError::IndexOutOfBounds {
                index: from.max(to),
                len,
            });
        }
        let tab = tabs.remove(from);
        tabs.insert(to, tab);
        Ok(())
    }
}
